//! `statuspoll-cli` — command-line front end for `statuspoll-core`.
//!
//! Loads a YAML endpoints file, builds one HTTP-backed status check per
//! configured service, and drives a single orchestration run to a verdict.

pub mod cmd;
pub mod http;
pub mod output;
pub mod settings;
