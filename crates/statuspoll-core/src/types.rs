use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ServiceStatus
// ---------------------------------------------------------------------------

/// The semantic answer a backend service gives about one application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Success,
    RetryAfter,
    Failure,
}

impl ServiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceStatus::Success => "success",
            ServiceStatus::RetryAfter => "retry_after",
            ServiceStatus::Failure => "failure",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ServiceStatus {
    type Err = crate::error::PollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(ServiceStatus::Success),
            "retry_after" => Ok(ServiceStatus::RetryAfter),
            "failure" => Ok(ServiceStatus::Failure),
            _ => Err(crate::error::PollError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ServiceOutcome
// ---------------------------------------------------------------------------

/// One query's classified result as seen by the aggregator.
///
/// `Fault` is distinct from a semantic [`ServiceStatus::Failure`]: it marks a
/// checker that returned an error or a worker task that panicked. The
/// decision rules treat faults like failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceOutcome {
    Success,
    RetryAfter,
    Failure,
    Fault,
}

impl From<ServiceStatus> for ServiceOutcome {
    fn from(status: ServiceStatus) -> Self {
        match status {
            ServiceStatus::Success => ServiceOutcome::Success,
            ServiceStatus::RetryAfter => ServiceOutcome::RetryAfter,
            ServiceStatus::Failure => ServiceOutcome::Failure,
        }
    }
}

// ---------------------------------------------------------------------------
// ApplicationStatus
// ---------------------------------------------------------------------------

/// The verdict kind of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Success,
    Failure,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Success => "success",
            ApplicationStatus::Failure => "failure",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ApplicationReport
// ---------------------------------------------------------------------------

/// Terminal artifact of one orchestration run.
///
/// `retries_count` carries the final round's retry-signal count for
/// unanimous verdicts and is `None` for timeout and disagreement verdicts,
/// which never reflect a retry decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationReport {
    pub identifier: String,
    pub status: ApplicationStatus,
    pub description: String,
    pub last_request_time: DateTime<Utc>,
    pub retries_count: Option<u32>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
