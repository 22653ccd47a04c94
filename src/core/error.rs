//! Error types for the poll and control-command paths.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connection refused, DNS, fetch rejected)
    #[error("network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// JSON was valid but did not have the snapshot shape
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// A parameter field was left empty before an update command
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A parameter field is not a finite number
    #[error("invalid number in field: {0}")]
    InvalidField(&'static str),

    /// Another control command has not completed yet
    #[error("a control command is already in flight")]
    Busy,
}

pub type Result<T> = std::result::Result<T, ClientError>;
