//! friendgraph-graph: In-memory friend graph and descriptive metrics.
//!
//! Builds an undirected graph from a seed person, their friends, and the
//! friendships among those friends, with edges canonicalized so neither
//! self-loops nor duplicate pairs can be stored. Metrics (density, degree,
//! batch statistics) are pure functions over the built graph.

pub mod graph;
pub mod metrics;

pub use graph::{build, duplicate_edge_count, EdgeInsert, SocialGraph};
pub use metrics::{chunk_statistics, complete_graph_edge_count, density, ChunkStatistics, GraphMetrics};
