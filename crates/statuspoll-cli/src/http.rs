use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use statuspoll_core::{ServiceStatus, StatusCheck};

/// HTTP adapter for one backend status service.
///
/// Queries `GET {base_url}/status/{identifier}` and expects a JSON body of
/// the form `{"status": "success" | "retry_after" | "failure"}`. Transport
/// errors, non-2xx responses, and unparseable bodies surface as `Err`,
/// which the dispatcher classifies as a fault.
pub struct HttpStatusCheck {
    name: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status: String,
}

impl HttpStatusCheck {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            name: name.into(),
            base_url,
            client,
        }
    }
}

#[async_trait]
impl StatusCheck for HttpStatusCheck {
    fn name(&self) -> &str {
        &self.name
    }

    async fn poll(&self, identifier: &str) -> anyhow::Result<ServiceStatus> {
        let url = format!("{}/status/{}", self.base_url, identifier);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.name))?
            .error_for_status()
            .with_context(|| format!("{} returned an error status", self.name))?;

        let body: StatusBody = response
            .json()
            .await
            .with_context(|| format!("{} returned an unparseable body", self.name))?;

        let status = body
            .status
            .parse::<ServiceStatus>()
            .with_context(|| format!("{} returned an unknown status", self.name))?;
        Ok(status)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
