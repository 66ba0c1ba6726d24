//! friendgraph-ingest: Turning API responses into batches and typed rows.
//!
//! Partitions identifier sets into bounded-size batches, renders the FQL
//! sent for each batch, and parses multiquery envelopes into named,
//! insertion-ordered result sets.

pub mod batch;
pub mod multiquery;
pub mod queries;

pub use batch::{combine_sublists, partition, partition_with_rng};
pub use multiquery::{parse, parse_and_combine, MultiqueryResults};
pub use queries::NamedQuery;
