use async_trait::async_trait;

use crate::types::ServiceStatus;

/// Contract for one backend status service.
///
/// Implementations are opaque remote calls from the orchestrator's point of
/// view: latency is unbounded (the orchestrator enforces its own global
/// budget) and an `Err` return is the fault channel, kept distinct from a
/// semantic [`ServiceStatus::Failure`].
#[async_trait]
pub trait StatusCheck: Send + Sync {
    /// Service name used in logs.
    fn name(&self) -> &str;

    /// Query this service for the status of `identifier`.
    async fn poll(&self, identifier: &str) -> anyhow::Result<ServiceStatus>;
}
