use std::time::Duration;

pub const DEFAULT_BUDGET: Duration = Duration::from_secs(15);
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(3);

/// Timing policy for one orchestration run, passed explicitly into the
/// orchestrator rather than read from process-wide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Maximum cumulative query time across all rounds. Only time spent
    /// waiting on service queries counts; backoff sleeps are excluded.
    pub budget: Duration,
    /// Fixed delay inserted before a retry round.
    pub backoff: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            budget: DEFAULT_BUDGET,
            backoff: DEFAULT_BACKOFF,
        }
    }
}
