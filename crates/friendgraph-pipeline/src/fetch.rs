//! Fetching friend identities and batched friendships from a [`FriendSource`].
//!
//! Batch queries run as one tokio task per chunk. A semaphore bounds how many
//! are in flight. Every batch must succeed: the first failure aborts the
//! remaining tasks and no partial result is returned.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use friendgraph_core::{Diagnostics, FriendGraphError, Identifier, IdentityRow, PipelineConfig, RelationRow};
use friendgraph_ingest::multiquery;
use friendgraph_ingest::queries::{self, FRIENDS_QUERY_NAME};

use crate::error::{PipelineError, Result};
use crate::source::{with_deadline, FriendSource};

/// Fetch the current user's friends via the identity query.
pub async fn fetch_friends<S: FriendSource>(
    source: &S,
    config: &PipelineConfig,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<IdentityRow>> {
    let query = queries::friends_query(config);
    tracing::debug!(fql = %query.fql, "Querying friends");

    let envelope = with_deadline(
        "friends query",
        config.request_timeout(),
        source.multiquery(vec![query]),
    )
    .await?;

    let mut parsed = multiquery::parse::<IdentityRow>(&envelope, diagnostics)?;
    parsed.take(FRIENDS_QUERY_NAME).ok_or_else(|| {
        PipelineError::Core(FriendGraphError::MalformedEnvelope(format!(
            "response has no `{FRIENDS_QUERY_NAME}` result set"
        )))
    })
}

/// Fetch friendships among friends, one multiquery per chunk.
///
/// Rows are returned in chunk order regardless of completion order.
pub async fn fetch_friendships<S: FriendSource>(
    source: Arc<S>,
    config: &PipelineConfig,
    chunks: &[Vec<Identifier>],
    diagnostics: &mut Diagnostics,
) -> Result<Vec<RelationRow>> {
    let semaphore = Arc::new(Semaphore::new(config.max_concurrent_requests));
    let limit = config.request_timeout();
    let mut tasks = JoinSet::new();

    for (batch, chunk) in chunks.iter().enumerate() {
        let query = queries::friendships_query(config, batch, chunk);
        let source = source.clone();
        let semaphore = semaphore.clone();

        tasks.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|e| PipelineError::TaskFailed(e.to_string()))?;

            tracing::debug!(batch, size = query.scope.len(), "Querying friendships batch");
            let stage = format!("friendships batch {batch}");
            let envelope = with_deadline(&stage, limit, source.multiquery(vec![query])).await?;
            Ok::<_, PipelineError>((batch, envelope))
        });
    }

    let mut envelopes = Vec::with_capacity(chunks.len());
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined.map_err(|e| PipelineError::TaskFailed(e.to_string()));
        match outcome.and_then(|inner| inner) {
            Ok(pair) => envelopes.push(pair),
            Err(e) => {
                tracing::error!(error = %e, "Friendship batch failed, aborting fetch");
                tasks.abort_all();
                return Err(e);
            }
        }
    }
    envelopes.sort_by_key(|(batch, _)| *batch);

    let mut rows = Vec::new();
    for (_, envelope) in &envelopes {
        let parsed = multiquery::parse::<RelationRow>(envelope, diagnostics)?;
        rows.extend(parsed.into_combined());
    }

    tracing::debug!(batches = envelopes.len(), rows = rows.len(), "Fetched friendships");
    Ok(rows)
}
