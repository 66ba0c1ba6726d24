//! friendgraph-core: Shared types, configuration, and error handling for friendgraph.
//!
//! This crate provides the foundational types used across all friendgraph components:
//! - Identifiers and the row shapes returned by the multiquery API
//! - Non-fatal diagnostic warnings accumulated during a pipeline run
//! - Pipeline configuration management
//! - Common error types

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod types;

pub use config::PipelineConfig;
pub use diagnostics::{DiagnosticWarning, Diagnostics};
pub use error::{FriendGraphError, Result};
pub use types::{Identifier, IdentityRow, RelationRow};
