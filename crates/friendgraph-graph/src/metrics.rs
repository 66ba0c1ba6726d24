//! Descriptive metrics over a built graph and its fetch batches.

use serde::{Deserialize, Serialize};

use friendgraph_core::{DiagnosticWarning, Diagnostics, FriendGraphError, Result};

use crate::graph::{duplicate_edge_count, SocialGraph};

/// Size profile of a batch partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkStatistics {
    /// Sum of all chunk lengths.
    pub total_items: usize,
    pub chunk_count: usize,
    /// Length of the first chunk. Every chunk but the last shares this size.
    pub chunk_size: usize,
}

/// Everything reported about one built graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    /// `None` when the graph has fewer than two nodes.
    pub density: Option<f64>,
    pub average_degree: f64,
    pub max_degree: usize,
    pub duplicate_edges: usize,
    pub chunks: ChunkStatistics,
}

/// Edge count of the complete graph on `node_count` nodes: n(n-1)/2.
///
/// The even factor is halved before multiplying so the intermediate never
/// exceeds the result.
pub fn complete_graph_edge_count(node_count: u64) -> u64 {
    if node_count < 2 {
        return 0;
    }
    if node_count % 2 == 0 {
        (node_count / 2) * (node_count - 1)
    } else {
        node_count * ((node_count - 1) / 2)
    }
}

/// Ratio of actual to possible edges in a simple undirected graph.
///
/// Undefined below two nodes. A result above 1.0 can only come from
/// duplicate edges upstream; it is returned unchanged and logged.
pub fn density(node_count: usize, edge_count: usize) -> Result<f64> {
    if node_count < 2 {
        return Err(FriendGraphError::InvalidArgument(format!(
            "density is undefined for {node_count} node(s)"
        )));
    }

    let possible = complete_graph_edge_count(node_count as u64);
    let value = edge_count as f64 / possible as f64;
    if value > 1.0 {
        tracing::warn!(
            node_count,
            edge_count,
            density = value,
            "Density above 1.0"
        );
    }
    Ok(value)
}

/// Summarize a partition. The first chunk's length stands in for the batch size.
pub fn chunk_statistics<T>(chunks: &[Vec<T>]) -> ChunkStatistics {
    ChunkStatistics {
        total_items: chunks.iter().map(Vec::len).sum(),
        chunk_count: chunks.len(),
        chunk_size: chunks.first().map(Vec::len).unwrap_or(0),
    }
}

/// Compute and log the full metric set for a graph built from `chunks`.
///
/// Density above 1.0 and a non-zero duplicate self-check are recorded as
/// warnings; neither aborts the run.
pub fn report<T>(graph: &SocialGraph, chunks: &[Vec<T>], diagnostics: &mut Diagnostics) -> GraphMetrics {
    let node_count = graph.node_count();
    let edge_count = graph.edge_count();

    let graph_density = if node_count < 2 {
        None
    } else {
        density(node_count, edge_count).ok()
    };
    if let Some(d) = graph_density.filter(|d| *d > 1.0) {
        diagnostics.record(DiagnosticWarning::DensityOutOfRange {
            density: d,
            node_count,
            edge_count,
        });
    }

    let duplicate_edges = duplicate_edge_count(graph);
    if duplicate_edges > 0 {
        diagnostics.record(DiagnosticWarning::DuplicateEdges {
            count: duplicate_edges,
        });
    }

    let degrees = graph.degrees();
    let average_degree = if node_count == 0 {
        0.0
    } else {
        degrees.iter().sum::<usize>() as f64 / node_count as f64
    };
    let max_degree = degrees.into_iter().max().unwrap_or(0);

    let metrics = GraphMetrics {
        node_count,
        edge_count,
        density: graph_density,
        average_degree,
        max_degree,
        duplicate_edges,
        chunks: chunk_statistics(chunks),
    };

    tracing::info!(
        nodes = metrics.node_count,
        edges = metrics.edge_count,
        density = ?metrics.density,
        average_degree = metrics.average_degree,
        max_degree = metrics.max_degree,
        chunk_count = metrics.chunks.chunk_count,
        chunk_size = metrics.chunks.chunk_size,
        total_items = metrics.chunks.total_items,
        "Graph metrics"
    );

    metrics
}
