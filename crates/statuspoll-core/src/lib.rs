//! `statuspoll-core` — time-budgeted, quorum-based status polling.
//!
//! Queries N independent backend services about one application identifier,
//! folds their answers into a single verdict, and retries the whole round
//! under a global deadline when the answers are inconclusive.
//!
//! # Architecture
//!
//! ```text
//! Orchestrator::perform_operation(identifier)
//!     │
//!     ▼
//! dispatch::fan_out    ← one tokio task per service, joined as a round
//!     │
//!     ▼
//! RoundTally           ← pure per-round counts of outcomes by kind
//!     │
//!     ▼
//! decision             ← timeout > unanimous success > disagreement
//!     │                  > retry (backoff + next round) > unanimous failure
//!     ▼
//! ApplicationReport    ← exactly one per run
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use statuspoll_core::{Orchestrator, PollConfig};
//!
//! let orchestrator = Orchestrator::new(services, PollConfig::default())?;
//! let report = orchestrator.perform_operation("app-42").await?;
//! println!("{}: {}", report.status, report.description);
//! ```

pub mod check;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod orchestrator;
pub mod tally;
pub mod types;

pub use check::StatusCheck;
pub use config::PollConfig;
pub use error::{PollError, Result};
pub use orchestrator::Orchestrator;
pub use tally::RoundTally;
pub use types::{ApplicationReport, ApplicationStatus, ServiceOutcome, ServiceStatus};
