//! Non-fatal anomalies detected while running the pipeline.
//!
//! Warnings never abort a run. They are logged as they are recorded and
//! returned with the run's report so callers can surface them as metrics.

use serde::{Deserialize, Serialize};

use crate::types::Identifier;

/// A non-fatal anomaly, tagged by kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum DiagnosticWarning {
    /// A relation row linked a person to themselves and was skipped.
    SelfLoopDiscarded { uid: Identifier },
    /// Two blocks in one envelope shared a name; the later block's rows won.
    DuplicateQueryName { name: String },
    /// Density exceeded 1.0, which means duplicate edges slipped through.
    DensityOutOfRange {
        density: f64,
        node_count: usize,
        edge_count: usize,
    },
    /// The self-check found edges stored in both directions.
    DuplicateEdges { count: usize },
}

/// Accumulates warnings over one pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    warnings: Vec<DiagnosticWarning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it.
    pub fn record(&mut self, warning: DiagnosticWarning) {
        match &warning {
            DiagnosticWarning::SelfLoopDiscarded { uid } => {
                tracing::warn!(uid = %uid, "Discarded self-loop relation row");
            }
            DiagnosticWarning::DuplicateQueryName { name } => {
                tracing::warn!(query = %name, "Duplicate query name in envelope, later block wins");
            }
            DiagnosticWarning::DensityOutOfRange {
                density,
                node_count,
                edge_count,
            } => {
                tracing::warn!(
                    density,
                    node_count,
                    edge_count,
                    "Graph density above 1.0, duplicate edges suspected"
                );
            }
            DiagnosticWarning::DuplicateEdges { count } => {
                tracing::warn!(count, "Duplicate directional edges detected");
            }
        }
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[DiagnosticWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<DiagnosticWarning> {
        self.warnings
    }
}
