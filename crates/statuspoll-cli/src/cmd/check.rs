use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use statuspoll_core::{ApplicationStatus, Orchestrator, StatusCheck};

use crate::http::HttpStatusCheck;
use crate::output;
use crate::settings::Settings;

/// Run one orchestration against the configured services and print the
/// report. Returns the verdict so `main` can pick the exit code.
pub fn run(
    config_path: &Path,
    identifier: &str,
    budget_secs: Option<u64>,
    backoff_secs: Option<u64>,
    json: bool,
) -> anyhow::Result<ApplicationStatus> {
    let settings = Settings::load(config_path)?;
    settings.validate()?;

    let mut poll_config = settings.poll_config();
    if let Some(secs) = budget_secs {
        poll_config.budget = Duration::from_secs(secs);
    }
    if let Some(secs) = backoff_secs {
        poll_config.backoff = Duration::from_secs(secs);
    }

    let client = reqwest::Client::new();
    let services: Vec<Arc<dyn StatusCheck>> = settings
        .services
        .iter()
        .map(|endpoint| {
            Arc::new(HttpStatusCheck::new(
                &endpoint.name,
                &endpoint.base_url,
                client.clone(),
            )) as Arc<dyn StatusCheck>
        })
        .collect();

    tracing::info!(
        identifier,
        services = services.len(),
        budget_secs = poll_config.budget.as_secs(),
        backoff_secs = poll_config.backoff.as_secs(),
        "starting status poll"
    );

    let orchestrator = Orchestrator::new(services, poll_config)?;
    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(orchestrator.perform_operation(identifier))?;

    output::print_report(&report, json)?;
    Ok(report.status)
}
