//! FQL rendering for batched multiqueries.

use friendgraph_core::config::IDS_PLACEHOLDER;
use friendgraph_core::{Identifier, PipelineConfig};

/// Query name used for the identity lookup.
pub const FRIENDS_QUERY_NAME: &str = "friends";

/// One named query inside a multiquery request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedQuery {
    pub name: String,
    pub fql: String,
    /// Uids the query is restricted to. Empty for unscoped queries.
    pub scope: Vec<Identifier>,
}

/// The identity query selecting the current user's friends.
pub fn friends_query(config: &PipelineConfig) -> NamedQuery {
    NamedQuery {
        name: FRIENDS_QUERY_NAME.to_string(),
        fql: config.friends_query.clone(),
        scope: Vec::new(),
    }
}

/// The relationship query for one batch of friends.
///
/// Uids are rendered as a quoted, comma-separated list in place of `{ids}`.
/// Embedded quotes are escaped so an uid can never terminate the literal.
pub fn friendships_query(config: &PipelineConfig, batch: usize, ids: &[Identifier]) -> NamedQuery {
    let rendered = ids
        .iter()
        .map(|id| format!("\"{}\"", escape(id.as_str())))
        .collect::<Vec<_>>()
        .join(",");

    NamedQuery {
        name: format!("friendships_{batch}"),
        fql: config.friendships_query.replace(IDS_PLACEHOLDER, &rendered),
        scope: ids.to_vec(),
    }
}

fn escape(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}
