//! Error types for the friendgraph-pipeline crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] friendgraph_core::FriendGraphError),

    #[error("Friend source failed during {stage}: {source}")]
    Source {
        stage: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Request timeout during {stage}: exceeded {secs}s limit")]
    Timeout { stage: String, secs: u64 },

    #[error("Batch task failed: {0}")]
    TaskFailed(String),

    #[error("Replay dump error: {0}")]
    Replay(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
