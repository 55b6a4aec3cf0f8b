use thiserror::Error;

#[derive(Debug, Error)]
pub enum PollError {
    #[error("no services configured: at least one status check is required")]
    NoServices,

    #[error("identifier must not be empty")]
    EmptyIdentifier,

    #[error("invalid service status '{0}': expected success, retry_after, or failure")]
    InvalidStatus(String),
}

pub type Result<T> = std::result::Result<T, PollError>;
