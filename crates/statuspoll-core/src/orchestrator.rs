use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;

use crate::check::StatusCheck;
use crate::config::PollConfig;
use crate::dispatch;
use crate::error::{PollError, Result};
use crate::tally::RoundTally;
use crate::types::{ApplicationReport, ApplicationStatus};

// ─── RunState ─────────────────────────────────────────────────────────────

/// Accumulated state carried across retry rounds.
///
/// Owned exclusively by the controller and moved by value into each loop
/// iteration; rounds never overlap, so no synchronization is needed.
#[derive(Debug, Clone, Copy, Default)]
struct RunState {
    /// Cumulative query time across rounds. Monotonically non-decreasing;
    /// backoff sleeps are not included.
    elapsed: Duration,
    /// Total retry signals seen across rounds.
    retries: u32,
}

// ─── Orchestrator ─────────────────────────────────────────────────────────

/// Drives rounds of concurrent status queries to a single verdict.
///
/// Each round fans out to every configured service, waits for all answers,
/// tallies them, and applies the decision rules in strict priority order:
/// timeout, unanimous success, any disagreement, retry, unanimous failure.
pub struct Orchestrator {
    services: Vec<Arc<dyn StatusCheck>>,
    config: PollConfig,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field(
                "services",
                &self.services.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("config", &self.config)
            .finish()
    }
}

impl Orchestrator {
    pub fn new(services: Vec<Arc<dyn StatusCheck>>, config: PollConfig) -> Result<Self> {
        if services.is_empty() {
            return Err(PollError::NoServices);
        }
        Ok(Self { services, config })
    }

    /// Poll every service about `identifier` until the verdict is final.
    ///
    /// Produces exactly one report per run and never surfaces a backend
    /// fault to the caller: faulting queries are tallied like failures.
    /// Rounds are strictly sequential; a retry round starts only after the
    /// previous round's decision and the fixed backoff sleep.
    pub async fn perform_operation(&self, identifier: &str) -> Result<ApplicationReport> {
        if identifier.is_empty() {
            return Err(PollError::EmptyIdentifier);
        }

        let n = self.services.len();
        let mut state = RunState::default();
        let mut round: u32 = 0;

        loop {
            round += 1;
            let remaining = self.config.budget.saturating_sub(state.elapsed);
            let started = Instant::now();

            // Queries still in flight when the budget runs out are aborted
            // (dropping the fan-out future tears down the round's JoinSet)
            // rather than allowed to finish.
            let fanned = tokio::time::timeout(
                remaining,
                dispatch::fan_out(&self.services, identifier),
            )
            .await;

            let outcomes = match fanned {
                Ok(outcomes) => outcomes,
                Err(_) => {
                    tracing::warn!(
                        round,
                        identifier,
                        total_retries = state.retries,
                        "query budget exhausted mid-round"
                    );
                    return Ok(self.timeout_report(identifier));
                }
            };

            state.elapsed += started.elapsed();
            let tally = RoundTally::from_outcomes(&outcomes);
            state.retries += tally.retry_after as u32;

            tracing::debug!(
                round,
                identifier,
                success = tally.success,
                retry_after = tally.retry_after,
                failure = tally.failure,
                fault = tally.fault,
                elapsed_ms = state.elapsed.as_millis() as u64,
                "round complete"
            );

            // Timeout dominates every other classification, even a round
            // that tallied unanimous success.
            if state.elapsed > self.config.budget {
                tracing::warn!(
                    round,
                    identifier,
                    total_retries = state.retries,
                    "query budget exceeded"
                );
                return Ok(self.timeout_report(identifier));
            }

            if tally.success == n {
                tracing::info!(round, identifier, total_retries = state.retries, "run succeeded");
                return Ok(self.report(
                    identifier,
                    ApplicationStatus::Success,
                    describe_success(n),
                    Some(tally.retry_after as u32),
                ));
            }

            // A disagreeing set of services is a fast-fail: no retry even
            // with budget remaining.
            if tally.success > 0 && tally.failed() > 0 {
                tracing::info!(round, identifier, "services disagree; failing without retry");
                return Ok(self.report(
                    identifier,
                    ApplicationStatus::Failure,
                    describe_disagreement(&tally, n),
                    None,
                ));
            }

            if tally.retry_after > 0 {
                tracing::debug!(
                    round,
                    identifier,
                    backoff_ms = self.config.backoff.as_millis() as u64,
                    "retry requested; backing off"
                );
                tokio::time::sleep(self.config.backoff).await;
                continue;
            }

            tracing::info!(round, identifier, "all services failed");
            return Ok(self.report(
                identifier,
                ApplicationStatus::Failure,
                describe_all_failed(n),
                Some(tally.retry_after as u32),
            ));
        }
    }

    fn report(
        &self,
        identifier: &str,
        status: ApplicationStatus,
        description: String,
        retries_count: Option<u32>,
    ) -> ApplicationReport {
        ApplicationReport {
            identifier: identifier.to_string(),
            status,
            description,
            last_request_time: Utc::now(),
            retries_count,
        }
    }

    fn timeout_report(&self, identifier: &str) -> ApplicationReport {
        self.report(
            identifier,
            ApplicationStatus::Failure,
            "Timeout exceeded".to_string(),
            None,
        )
    }
}

// ─── Descriptions ─────────────────────────────────────────────────────────

// The two-service wording is the stable surface callers match on; wider
// fan-outs get count-bearing equivalents.

fn describe_success(n: usize) -> String {
    if n == 2 {
        "Both services returned success".to_string()
    } else {
        format!("All {n} services returned success")
    }
}

fn describe_disagreement(tally: &RoundTally, n: usize) -> String {
    if n == 2 {
        "One service returned success, another is failure".to_string()
    } else {
        format!(
            "{} of {n} services returned success, {} failed",
            tally.success,
            tally.failed()
        )
    }
}

fn describe_all_failed(n: usize) -> String {
    if n == 2 {
        "Both services failed".to_string()
    } else {
        format!("All {n} services failed")
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ServiceStatus;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Answers with a fixed status after a fixed virtual delay.
    struct Fixed {
        status: ServiceStatus,
        delay: Duration,
    }

    impl Fixed {
        fn new(status: ServiceStatus, delay_secs: u64) -> Arc<dyn StatusCheck> {
            Arc::new(Self {
                status,
                delay: Duration::from_secs(delay_secs),
            })
        }
    }

    #[async_trait]
    impl StatusCheck for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn poll(&self, _identifier: &str) -> anyhow::Result<ServiceStatus> {
            tokio::time::sleep(self.delay).await;
            Ok(self.status)
        }
    }

    /// Answers one scripted status per round, repeating the last entry once
    /// the script runs out.
    struct Scripted {
        script: Mutex<VecDeque<ServiceStatus>>,
        delay: Duration,
    }

    impl Scripted {
        fn new(script: &[ServiceStatus], delay_secs: u64) -> Arc<dyn StatusCheck> {
            Arc::new(Self {
                script: Mutex::new(script.iter().copied().collect()),
                delay: Duration::from_secs(delay_secs),
            })
        }
    }

    #[async_trait]
    impl StatusCheck for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn poll(&self, _identifier: &str) -> anyhow::Result<ServiceStatus> {
            tokio::time::sleep(self.delay).await;
            let mut script = self.script.lock().unwrap();
            let status = if script.len() > 1 {
                script.pop_front().unwrap()
            } else {
                *script.front().expect("script must not be empty")
            };
            Ok(status)
        }
    }

    struct Erroring;

    #[async_trait]
    impl StatusCheck for Erroring {
        fn name(&self) -> &str {
            "erroring"
        }

        async fn poll(&self, _identifier: &str) -> anyhow::Result<ServiceStatus> {
            Err(anyhow::anyhow!("connection reset"))
        }
    }

    fn orchestrator(services: Vec<Arc<dyn StatusCheck>>) -> Orchestrator {
        Orchestrator::new(services, PollConfig::default()).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_both_success() {
        let orchestrator = orchestrator(vec![
            Fixed::new(ServiceStatus::Success, 2),
            Fixed::new(ServiceStatus::Success, 3),
        ]);
        let report = orchestrator.perform_operation("app-1").await.unwrap();
        assert_eq!(report.status, ApplicationStatus::Success);
        assert_eq!(report.description, "Both services returned success");
        assert_eq!(report.retries_count, Some(0));
        assert_eq!(report.identifier, "app-1");
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_split_decision_fails_without_retry() {
        let orchestrator = orchestrator(vec![
            Fixed::new(ServiceStatus::Success, 1),
            Fixed::new(ServiceStatus::Failure, 1),
        ]);
        let before = Instant::now();
        let report = orchestrator.perform_operation("app-1").await.unwrap();
        assert_eq!(report.status, ApplicationStatus::Failure);
        assert_eq!(
            report.description,
            "One service returned success, another is failure"
        );
        assert_eq!(report.retries_count, None);
        // Fast-fail: exactly one round, no backoff sleep.
        assert!(before.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_both_failed() {
        let orchestrator = orchestrator(vec![
            Fixed::new(ServiceStatus::Failure, 1),
            Fixed::new(ServiceStatus::Failure, 1),
        ]);
        let report = orchestrator.perform_operation("app-1").await.unwrap();
        assert_eq!(report.status, ApplicationStatus::Failure);
        assert_eq!(report.description, "Both services failed");
        assert_eq!(report.retries_count, Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_retry_then_success() {
        let orchestrator = orchestrator(vec![
            Scripted::new(&[ServiceStatus::RetryAfter, ServiceStatus::Success], 1),
            Scripted::new(&[ServiceStatus::Failure, ServiceStatus::Success], 1),
        ]);
        let before = Instant::now();
        let report = orchestrator.perform_operation("app-1").await.unwrap();
        assert_eq!(report.status, ApplicationStatus::Success);
        assert_eq!(report.description, "Both services returned success");
        // Final round tallied zero retry signals.
        assert_eq!(report.retries_count, Some(0));
        // Exactly one backoff sleep between the two rounds.
        let elapsed = before.elapsed();
        assert!(elapsed >= Duration::from_secs(5), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(6), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_repeated_retries_hit_timeout() {
        let orchestrator = orchestrator(vec![
            Fixed::new(ServiceStatus::RetryAfter, 4),
            Fixed::new(ServiceStatus::RetryAfter, 4),
        ]);
        let report = orchestrator.perform_operation("app-1").await.unwrap();
        assert_eq!(report.status, ApplicationStatus::Failure);
        assert_eq!(report.description, "Timeout exceeded");
        assert_eq!(report.retries_count, None);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_dominates_a_successful_tally() {
        // Both services would report success, but only after the budget is
        // long gone; the round is aborted mid-flight.
        let orchestrator = orchestrator(vec![
            Fixed::new(ServiceStatus::Success, 20),
            Fixed::new(ServiceStatus::Success, 20),
        ]);
        let report = orchestrator.perform_operation("app-1").await.unwrap();
        assert_eq!(report.status, ApplicationStatus::Failure);
        assert_eq!(report.description, "Timeout exceeded");
        assert_eq!(report.retries_count, None);
    }

    #[tokio::test(start_paused = true)]
    async fn fault_is_classified_like_failure() {
        let orchestrator = orchestrator(vec![
            Fixed::new(ServiceStatus::Success, 1),
            Arc::new(Erroring),
        ]);
        let report = orchestrator.perform_operation("app-1").await.unwrap();
        assert_eq!(report.status, ApplicationStatus::Failure);
        assert_eq!(
            report.description,
            "One service returned success, another is failure"
        );
        assert_eq!(report.retries_count, None);
    }

    #[tokio::test(start_paused = true)]
    async fn all_faults_count_as_unanimous_failure() {
        let orchestrator = orchestrator(vec![Arc::new(Erroring), Arc::new(Erroring)]);
        let report = orchestrator.perform_operation("app-1").await.unwrap();
        assert_eq!(report.status, ApplicationStatus::Failure);
        assert_eq!(report.description, "Both services failed");
        assert_eq!(report.retries_count, Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn three_services_generalize_the_decision_rules() {
        let all = orchestrator(vec![
            Fixed::new(ServiceStatus::Success, 1),
            Fixed::new(ServiceStatus::Success, 1),
            Fixed::new(ServiceStatus::Success, 1),
        ]);
        let report = all.perform_operation("app-1").await.unwrap();
        assert_eq!(report.status, ApplicationStatus::Success);
        assert_eq!(report.description, "All 3 services returned success");

        let split = orchestrator(vec![
            Fixed::new(ServiceStatus::Success, 1),
            Fixed::new(ServiceStatus::Success, 1),
            Fixed::new(ServiceStatus::Failure, 1),
        ]);
        let report = split.perform_operation("app-1").await.unwrap();
        assert_eq!(report.status, ApplicationStatus::Failure);
        assert_eq!(
            report.description,
            "2 of 3 services returned success, 1 failed"
        );

        let failed = orchestrator(vec![
            Fixed::new(ServiceStatus::Failure, 1),
            Fixed::new(ServiceStatus::Failure, 1),
            Fixed::new(ServiceStatus::Failure, 1),
        ]);
        let report = failed.perform_operation("app-1").await.unwrap();
        assert_eq!(report.status, ApplicationStatus::Failure);
        assert_eq!(report.description, "All 3 services failed");
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_does_not_consume_the_query_budget() {
        // Four retry rounds of 2s query time each (8s total) interleaved
        // with 3s backoffs (9s of sleep) stay inside the 15s query budget;
        // a wall-clock budget would have expired.
        let orchestrator = orchestrator(vec![
            Scripted::new(
                &[
                    ServiceStatus::RetryAfter,
                    ServiceStatus::RetryAfter,
                    ServiceStatus::RetryAfter,
                    ServiceStatus::RetryAfter,
                    ServiceStatus::Success,
                ],
                2,
            ),
            Scripted::new(
                &[
                    ServiceStatus::RetryAfter,
                    ServiceStatus::RetryAfter,
                    ServiceStatus::RetryAfter,
                    ServiceStatus::RetryAfter,
                    ServiceStatus::Success,
                ],
                2,
            ),
        ]);
        let before = Instant::now();
        let report = orchestrator.perform_operation("app-1").await.unwrap();
        assert_eq!(report.status, ApplicationStatus::Success);
        // 5 rounds x 2s of queries + 4 backoffs x 3s = 22s wall clock.
        assert!(before.elapsed() >= Duration::from_secs(22));
    }

    #[tokio::test]
    async fn empty_identifier_is_rejected() {
        let orchestrator = orchestrator(vec![Fixed::new(ServiceStatus::Success, 0)]);
        let err = orchestrator.perform_operation("").await.unwrap_err();
        assert!(matches!(err, PollError::EmptyIdentifier));
    }

    #[test]
    fn no_services_is_rejected() {
        let err = Orchestrator::new(Vec::new(), PollConfig::default()).unwrap_err();
        assert!(matches!(err, PollError::NoServices));
    }

    #[tokio::test(start_paused = true)]
    async fn custom_budget_is_honored() {
        let config = PollConfig {
            budget: Duration::from_secs(3),
            backoff: Duration::from_secs(1),
        };
        let services = vec![
            Fixed::new(ServiceStatus::RetryAfter, 2),
            Fixed::new(ServiceStatus::RetryAfter, 2),
        ];
        let orchestrator = Orchestrator::new(services, config).unwrap();
        let report = orchestrator.perform_operation("app-1").await.unwrap();
        assert_eq!(report.description, "Timeout exceeded");
        assert_eq!(report.retries_count, None);
    }
}
