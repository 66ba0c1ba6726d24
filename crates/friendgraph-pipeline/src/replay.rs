//! A [`FriendSource`] that serves a recorded dump instead of the network.
//!
//! Dump format:
//!
//! ```json
//! {
//!   "me": "100",
//!   "friends": [ { "uid": "1", "name": "Ada" }, ... ],
//!   "friendships": [ { "uid1": "1", "uid2": "2" }, ... ]
//! }
//! ```
//!
//! A friendships query scoped to a batch returns the recorded rows whose
//! `uid1` falls in that batch, mirroring how the live relationship query
//! filters on `uid1 IN (...)`.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use friendgraph_core::{Identifier, IdentityRow, RelationRow};
use friendgraph_ingest::queries::FRIENDS_QUERY_NAME;
use friendgraph_ingest::NamedQuery;

use crate::error::{PipelineError, Result};
use crate::source::FriendSource;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayDump {
    pub me: Identifier,
    #[serde(default)]
    pub friends: Vec<IdentityRow>,
    #[serde(default)]
    pub friendships: Vec<RelationRow>,
}

#[derive(Debug, Clone)]
pub struct ReplaySource {
    dump: ReplayDump,
}

impl ReplaySource {
    pub fn new(dump: ReplayDump) -> Self {
        Self { dump }
    }

    /// Load a dump from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let dump: ReplayDump = serde_json::from_str(&raw)
            .map_err(|e| PipelineError::Replay(format!("{}: {e}", path.display())))?;

        tracing::info!(
            path = %path.display(),
            friends = dump.friends.len(),
            friendships = dump.friendships.len(),
            "Loaded replay dump"
        );
        Ok(Self::new(dump))
    }

    fn answer(&self, query: &NamedQuery) -> anyhow::Result<Value> {
        let rows = if query.name == FRIENDS_QUERY_NAME {
            serde_json::to_value(&self.dump.friends)?
        } else {
            let scope: HashSet<&Identifier> = query.scope.iter().collect();
            let matching: Vec<&RelationRow> = self
                .dump
                .friendships
                .iter()
                .filter(|row| scope.contains(&row.id_a))
                .collect();
            serde_json::to_value(matching)?
        };
        Ok(json!({ "name": query.name, "fql_result_set": rows }))
    }
}

impl FriendSource for ReplaySource {
    async fn current_user(&self) -> anyhow::Result<Identifier> {
        Ok(self.dump.me.clone())
    }

    async fn multiquery(&self, queries: Vec<NamedQuery>) -> anyhow::Result<Value> {
        let blocks = queries
            .iter()
            .map(|q| self.answer(q))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(json!({ "data": blocks }))
    }
}
