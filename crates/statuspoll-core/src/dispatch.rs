use std::sync::Arc;

use tokio::task::JoinSet;

use crate::check::StatusCheck;
use crate::types::ServiceOutcome;

/// Query every service concurrently and wait for all of them.
///
/// One task per service, scoped to this round: the [`JoinSet`] is dropped on
/// return (or when the caller's deadline cancels this future), so no worker
/// outlives the round. There is no short-circuit — the round completes only
/// once every query has answered. A checker error or a panicked task yields
/// [`ServiceOutcome::Fault`]; output order carries no meaning.
pub async fn fan_out(
    services: &[Arc<dyn StatusCheck>],
    identifier: &str,
) -> Vec<ServiceOutcome> {
    let mut set = JoinSet::new();
    for service in services {
        let service = Arc::clone(service);
        let identifier = identifier.to_string();
        set.spawn(async move {
            match service.poll(&identifier).await {
                Ok(status) => ServiceOutcome::from(status),
                Err(e) => {
                    tracing::warn!(service = service.name(), error = %e, "status check failed");
                    ServiceOutcome::Fault
                }
            }
        });
    }

    let mut outcomes = Vec::with_capacity(services.len());
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                tracing::warn!(error = %e, "status check task panicked");
                outcomes.push(ServiceOutcome::Fault);
            }
        }
    }
    outcomes
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
