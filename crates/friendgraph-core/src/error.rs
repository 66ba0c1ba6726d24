use thiserror::Error;

/// Top-level error type for the friendgraph core.
///
/// `InvalidArgument` and `MalformedEnvelope` are fatal to the current run.
/// Non-fatal anomalies are reported as [`crate::DiagnosticWarning`]s instead.
#[derive(Error, Debug)]
pub enum FriendGraphError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Malformed multiquery envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FriendGraphError>;
