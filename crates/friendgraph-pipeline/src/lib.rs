//! friendgraph-pipeline: Batched friend-graph ingestion.
//!
//! Fetches a user's friends from a [`FriendSource`], partitions them into
//! bounded batches, queries friendships among them concurrently, builds the
//! undirected friend graph, and reports its metrics.

pub mod error;
pub mod fetch;
pub mod replay;
pub mod source;
pub mod types;

pub use error::PipelineError;
pub use replay::{ReplayDump, ReplaySource};
pub use source::FriendSource;
pub use types::{FriendsPage, PipelineOutcome, PipelineReport};

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use friendgraph_core::{Diagnostics, Identifier, PipelineConfig};
use friendgraph_graph::{graph, metrics};
use friendgraph_ingest::batch;

use crate::source::with_deadline;

/// Runs the ingestion pipeline against one friend source.
pub struct Orchestrator<S> {
    source: Arc<S>,
    config: PipelineConfig,
}

impl<S: FriendSource> Orchestrator<S> {
    /// Create an orchestrator. Fails if the configuration is unusable.
    pub fn new(source: S, config: PipelineConfig) -> error::Result<Self> {
        config.validate()?;
        Ok(Self {
            source: Arc::new(source),
            config,
        })
    }

    /// Run the pipeline once.
    ///
    /// Sequences: current user → friends → batches → friendships (concurrent)
    /// → graph → metrics. Any fetch or parse failure aborts the run.
    pub async fn run(&self) -> error::Result<PipelineOutcome> {
        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let mut diagnostics = Diagnostics::new();

        tracing::info!(run_id = %run_id, "Pipeline run started");

        let seed = with_deadline(
            "current user lookup",
            self.config.request_timeout(),
            self.source.current_user(),
        )
        .await?;

        let stage = Instant::now();
        let friends = fetch::fetch_friends(self.source.as_ref(), &self.config, &mut diagnostics).await?;
        let friend_ids: Vec<Identifier> = friends.iter().map(|f| f.uid.clone()).collect();
        tracing::info!(
            run_id = %run_id,
            friends = friend_ids.len(),
            elapsed_ms = stage.elapsed().as_millis() as u64,
            "Fetched friends"
        );

        let chunks = self.partition(&friend_ids)?;

        let stage = Instant::now();
        let friendships = fetch::fetch_friendships(
            self.source.clone(),
            &self.config,
            &chunks,
            &mut diagnostics,
        )
        .await?;
        tracing::info!(
            run_id = %run_id,
            batches = chunks.len(),
            rows = friendships.len(),
            elapsed_ms = stage.elapsed().as_millis() as u64,
            "Fetched friendships"
        );

        let stage = Instant::now();
        let graph = graph::build(&seed, &friend_ids, &friendships, &mut diagnostics)?;
        tracing::info!(
            run_id = %run_id,
            elapsed_ms = stage.elapsed().as_millis() as u64,
            "Built friend graph"
        );

        let metrics = metrics::report(&graph, &chunks, &mut diagnostics);
        let computation_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            run_id = %run_id,
            edges = metrics.edge_count,
            warnings = diagnostics.len(),
            computation_ms,
            "Pipeline run complete"
        );

        let report = PipelineReport {
            run_id,
            started_at,
            seed,
            page: FriendsPage {
                friends,
                number_of_friendships: graph.edge_count(),
            },
            metrics,
            warnings: diagnostics.into_warnings(),
            computation_ms,
        };

        Ok(PipelineOutcome { graph, report })
    }

    fn partition(&self, friend_ids: &[Identifier]) -> error::Result<Vec<Vec<Identifier>>> {
        let chunks = match self.config.random_seed {
            Some(seed) if self.config.randomize_chunks => batch::partition_with_rng(
                friend_ids,
                self.config.chunk_size,
                true,
                &mut StdRng::seed_from_u64(seed),
            )?,
            _ => batch::partition(
                friend_ids,
                self.config.chunk_size,
                self.config.randomize_chunks,
            )?,
        };
        Ok(chunks)
    }
}
