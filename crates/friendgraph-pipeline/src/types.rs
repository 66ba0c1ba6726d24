//! Result types handed back to the caller after a pipeline run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use friendgraph_core::{DiagnosticWarning, Identifier, IdentityRow};
use friendgraph_graph::{GraphMetrics, SocialGraph};

/// Payload for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendsPage {
    pub friends: Vec<IdentityRow>,
    /// Edge count of the built graph.
    pub number_of_friendships: usize,
}

/// Complete record of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub seed: Identifier,
    pub page: FriendsPage,
    pub metrics: GraphMetrics,
    pub warnings: Vec<DiagnosticWarning>,
    pub computation_ms: u64,
}

/// A finished run: the graph itself plus its report.
///
/// The caller owns the graph for the rest of the request and drops it
/// once the page has been rendered.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub graph: SocialGraph,
    pub report: PipelineReport,
}
