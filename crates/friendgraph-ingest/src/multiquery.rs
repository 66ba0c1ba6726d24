//! Multiquery envelope parsing.
//!
//! The API bundles several named result sets into one response:
//!
//! ```json
//! { "data": [ { "name": "friends", "fql_result_set": [ {...}, ... ] }, ... ] }
//! ```
//!
//! Rows are deserialized into a caller-chosen type `R` at this boundary, so
//! a missing field is reported as a malformed envelope instead of failing
//! later during graph construction.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use friendgraph_core::{DiagnosticWarning, Diagnostics, FriendGraphError, Result};

const DATA_KEY: &str = "data";
const NAME_KEY: &str = "name";
const RESULT_SET_KEY: &str = "fql_result_set";

/// Named result sets from one envelope, in insertion order.
///
/// Order is that of each name's first appearance in the envelope. A name
/// that appears again keeps its position but takes the later block's rows.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiqueryResults<R> {
    entries: Vec<(String, Vec<R>)>,
    positions: HashMap<String, usize>,
}

impl<R> Default for MultiqueryResults<R> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<R> MultiqueryResults<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result set. Returns the rows it replaced, if the name was taken.
    pub fn insert(&mut self, name: String, rows: Vec<R>) -> Option<Vec<R>> {
        match self.positions.get(&name) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, rows)),
            None => {
                self.positions.insert(name.clone(), self.entries.len());
                self.entries.push((name, rows));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&[R]> {
        self.positions
            .get(name)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    /// Remove and return one result set, keeping the order of the rest.
    pub fn take(&mut self, name: &str) -> Option<Vec<R>> {
        let pos = self.positions.remove(name)?;
        let (_, rows) = self.entries.remove(pos);
        for p in self.positions.values_mut() {
            if *p > pos {
                *p -= 1;
            }
        }
        Some(rows)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[R])> {
        self.entries
            .iter()
            .map(|(name, rows)| (name.as_str(), rows.as_slice()))
    }

    /// Number of distinct query names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total rows across all result sets.
    pub fn row_count(&self) -> usize {
        self.entries.iter().map(|(_, rows)| rows.len()).sum()
    }

    /// Concatenate every result set in insertion order.
    pub fn combine(&self) -> Vec<R>
    where
        R: Clone,
    {
        self.entries
            .iter()
            .flat_map(|(_, rows)| rows.iter().cloned())
            .collect()
    }

    /// Owned variant of [`combine`](Self::combine).
    pub fn into_combined(self) -> Vec<R> {
        self.entries.into_iter().flat_map(|(_, rows)| rows).collect()
    }
}

/// Parse an envelope into named result sets.
///
/// Duplicate names follow last-write-wins; each collision is recorded as a
/// [`DiagnosticWarning::DuplicateQueryName`].
pub fn parse<R: DeserializeOwned>(
    envelope: &Value,
    diagnostics: &mut Diagnostics,
) -> Result<MultiqueryResults<R>> {
    let mut results = MultiqueryResults::new();

    for (index, block) in blocks(envelope)?.iter().enumerate() {
        let (name, rows) = parse_block(index, block)?;
        if results.insert(name.to_string(), rows).is_some() {
            diagnostics.record(DiagnosticWarning::DuplicateQueryName {
                name: name.to_string(),
            });
        }
    }

    tracing::debug!(
        queries = results.len(),
        rows = results.row_count(),
        "Parsed multiquery envelope"
    );
    Ok(results)
}

/// Flatten every block's rows in envelope order.
///
/// Unlike [`parse`], blocks sharing a name are all kept, so no rows are lost
/// to a name collision.
pub fn parse_and_combine<R: DeserializeOwned>(envelope: &Value) -> Result<Vec<R>> {
    let mut combined = Vec::new();
    for (index, block) in blocks(envelope)?.iter().enumerate() {
        let (_, rows) = parse_block(index, block)?;
        combined.extend(rows);
    }
    Ok(combined)
}

fn blocks(envelope: &Value) -> Result<&Vec<Value>> {
    envelope
        .get(DATA_KEY)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            FriendGraphError::MalformedEnvelope(format!("missing top-level `{DATA_KEY}` list"))
        })
}

fn parse_block<R: DeserializeOwned>(index: usize, block: &Value) -> Result<(&str, Vec<R>)> {
    let name = block
        .get(NAME_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            FriendGraphError::MalformedEnvelope(format!("block {index} has no string `{NAME_KEY}`"))
        })?;

    let raw_rows = block
        .get(RESULT_SET_KEY)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            FriendGraphError::MalformedEnvelope(format!(
                "block {index} ({name}) has no `{RESULT_SET_KEY}` list"
            ))
        })?;

    let rows = raw_rows
        .iter()
        .enumerate()
        .map(|(row_index, row)| {
            R::deserialize(row).map_err(|e| {
                FriendGraphError::MalformedEnvelope(format!(
                    "block {index} ({name}) row {row_index}: {e}"
                ))
            })
        })
        .collect::<Result<Vec<R>>>()?;

    Ok((name, rows))
}
