//! Core domain types for the friend graph.
//!
//! Rows arrive from the multiquery API as loosely-typed JSON. These structs
//! pin down the fields the pipeline relies on so shape errors surface at the
//! parse boundary rather than deep inside graph construction.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ── Identifier ────────────────────────────────────────────────────

/// Opaque key for a person in the social graph.
///
/// Equality is exact string equality; no normalization is applied. The API
/// sometimes returns uids as JSON numbers, so deserialization accepts either
/// form and stores the decimal text. Serialization always emits a string.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for Identifier {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Identifier(s),
            RawId::Unsigned(n) => Identifier(n.to_string()),
            RawId::Signed(n) => Identifier(n.to_string()),
        })
    }
}

// ── Rows ──────────────────────────────────────────────────────────

/// One friendship between two people, as returned by a relationship query.
///
/// The pair is unordered; `{uid1: a, uid2: b}` and `{uid1: b, uid2: a}`
/// describe the same edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RelationRow {
    #[serde(rename = "uid1")]
    pub id_a: Identifier,
    #[serde(rename = "uid2")]
    pub id_b: Identifier,
}

impl RelationRow {
    pub fn new(id_a: impl Into<Identifier>, id_b: impl Into<Identifier>) -> Self {
        Self {
            id_a: id_a.into(),
            id_b: id_b.into(),
        }
    }

    /// Whether both endpoints are the same person.
    pub fn is_self_loop(&self) -> bool {
        self.id_a == self.id_b
    }
}

/// A friend returned by an identity query.
///
/// Only `uid` is required. Any other columns the query selected are kept
/// verbatim in `extra` and passed through to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentityRow {
    pub uid: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl IdentityRow {
    pub fn new(uid: impl Into<Identifier>, name: Option<&str>) -> Self {
        Self {
            uid: uid.into(),
            name: name.map(str::to_string),
            extra: serde_json::Map::new(),
        }
    }
}
