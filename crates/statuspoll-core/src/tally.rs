use crate::types::ServiceOutcome;

/// Per-round counts of query outcomes by kind.
///
/// Pure and order-independent: the tally of a round is the same whichever
/// service answers first, and the counts always sum to the number of
/// services queried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundTally {
    pub success: usize,
    pub retry_after: usize,
    pub failure: usize,
    pub fault: usize,
}

impl RoundTally {
    pub fn from_outcomes(outcomes: &[ServiceOutcome]) -> Self {
        let mut tally = RoundTally::default();
        for outcome in outcomes {
            match outcome {
                ServiceOutcome::Success => tally.success += 1,
                ServiceOutcome::RetryAfter => tally.retry_after += 1,
                ServiceOutcome::Failure => tally.failure += 1,
                ServiceOutcome::Fault => tally.fault += 1,
            }
        }
        tally
    }

    pub fn total(&self) -> usize {
        self.success + self.retry_after + self.failure + self.fault
    }

    /// Failures and faults are indistinguishable to the decision rules.
    pub fn failed(&self) -> usize {
        self.failure + self.fault
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
