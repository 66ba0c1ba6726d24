//! The seam to the external query API.
//!
//! The pipeline never talks to the network itself. Anything that can answer
//! a multiquery with a raw envelope can drive it: an HTTP client, a cache,
//! or the recorded dump in [`crate::replay`].

use std::future::Future;
use std::time::Duration;

use serde_json::Value;

use friendgraph_core::Identifier;
use friendgraph_ingest::NamedQuery;

use crate::error::{PipelineError, Result};

/// An external client answering friend queries.
///
/// Authentication, retries, and backoff are the implementor's concern.
pub trait FriendSource: Send + Sync + 'static {
    /// Identifier of the user whose friend graph is being built.
    fn current_user(&self) -> impl Future<Output = anyhow::Result<Identifier>> + Send;

    /// Execute a multiquery and return the raw response envelope.
    fn multiquery(
        &self,
        queries: Vec<NamedQuery>,
    ) -> impl Future<Output = anyhow::Result<Value>> + Send;
}

/// Await a source call under a deadline, tagging failures with `stage`.
pub(crate) async fn with_deadline<T, F>(stage: &str, limit: Duration, call: F) -> Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => Err(PipelineError::Source {
            stage: stage.to_string(),
            source,
        }),
        Err(_) => Err(PipelineError::Timeout {
            stage: stage.to_string(),
            secs: limit.as_secs(),
        }),
    }
}
