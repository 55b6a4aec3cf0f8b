use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use statuspoll_core::PollConfig;
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ServiceEndpoint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    pub name: String,
    pub base_url: String,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// The endpoints file: which services to poll and the timing policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub services: Vec<ServiceEndpoint>,
    #[serde(default = "default_budget_secs")]
    pub budget_secs: u64,
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,
}

fn default_budget_secs() -> u64 {
    15
}

fn default_backoff_secs() -> u64 {
    3
}

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read endpoints file {}", path.display()))?;
        let settings: Settings = serde_yaml::from_str(&data)
            .with_context(|| format!("invalid endpoints file {}", path.display()))?;
        Ok(settings)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.services.is_empty() {
            bail!("endpoints file lists no services");
        }
        for endpoint in &self.services {
            if endpoint.name.is_empty() {
                bail!("service with base_url '{}' has an empty name", endpoint.base_url);
            }
            if !endpoint.base_url.starts_with("http://") && !endpoint.base_url.starts_with("https://")
            {
                bail!(
                    "service '{}' has a non-HTTP base_url: '{}'",
                    endpoint.name,
                    endpoint.base_url
                );
            }
        }
        if self.budget_secs == 0 {
            bail!("budget_secs must be at least 1");
        }
        Ok(())
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            budget: Duration::from_secs(self.budget_secs),
            backoff: Duration::from_secs(self.backoff_secs),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
