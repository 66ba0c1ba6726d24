//! In-memory undirected friend graph.
//!
//! Nodes are assigned a dense index (0..N-1) in insertion order. Each edge is
//! stored exactly once as a canonical `(low, high)` index pair, with a
//! symmetric adjacency list for neighbor lookup.

use std::collections::{HashMap, HashSet};

use friendgraph_core::{
    DiagnosticWarning, Diagnostics, FriendGraphError, Identifier, RelationRow, Result,
};

/// Outcome of a single [`SocialGraph::add_edge`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInsert {
    Added,
    AlreadyPresent,
    /// Both endpoints were the same node; nothing was stored.
    SelfLoop,
}

/// A simple undirected graph: no self-loops, no parallel edges.
#[derive(Debug, Clone, Default)]
pub struct SocialGraph {
    /// All nodes, indexed by dense index.
    nodes: Vec<Identifier>,
    /// Map from identifier → dense index.
    node_index: HashMap<Identifier, usize>,
    /// `adjacency[i]` = neighbors of node `i`, in insertion order.
    adjacency: Vec<Vec<usize>>,
    /// Canonical `(low, high)` pairs, in insertion order.
    edges: Vec<(usize, usize)>,
    edge_set: HashSet<(usize, usize)>,
}

impl SocialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node if absent and return its dense index.
    pub fn add_node(&mut self, id: &Identifier) -> usize {
        if let Some(&idx) = self.node_index.get(id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(id.clone());
        self.node_index.insert(id.clone(), idx);
        self.adjacency.push(Vec::new());
        idx
    }

    /// Add the undirected edge {a, b}, creating missing endpoints.
    ///
    /// Idempotent: `{a, b}` and `{b, a}` are the same edge. A self-loop is
    /// refused without touching the node set.
    pub fn add_edge(&mut self, a: &Identifier, b: &Identifier) -> EdgeInsert {
        if a == b {
            return EdgeInsert::SelfLoop;
        }

        let ia = self.add_node(a);
        let ib = self.add_node(b);
        let key = (ia.min(ib), ia.max(ib));

        if !self.edge_set.insert(key) {
            return EdgeInsert::AlreadyPresent;
        }
        self.edges.push(key);
        self.adjacency[ia].push(ib);
        self.adjacency[ib].push(ia);
        EdgeInsert::Added
    }

    pub fn contains_node(&self, id: &Identifier) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn contains_edge(&self, a: &Identifier, b: &Identifier) -> bool {
        match (self.node_index.get(a), self.node_index.get(b)) {
            (Some(&ia), Some(&ib)) => self.edge_set.contains(&(ia.min(ib), ia.max(ib))),
            _ => false,
        }
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of neighbors of `id`, or `None` if the node is absent.
    pub fn degree(&self, id: &Identifier) -> Option<usize> {
        self.node_index.get(id).map(|&idx| self.adjacency[idx].len())
    }

    pub fn neighbors(&self, id: &Identifier) -> Vec<&Identifier> {
        self.node_index
            .get(id)
            .map(|&idx| self.adjacency[idx].iter().map(|&n| &self.nodes[n]).collect())
            .unwrap_or_default()
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[Identifier] {
        &self.nodes
    }

    /// All edges in insertion order, each listed once.
    pub fn edges(&self) -> impl Iterator<Item = (&Identifier, &Identifier)> {
        self.edges
            .iter()
            .map(move |&(a, b)| (&self.nodes[a], &self.nodes[b]))
    }

    /// Degree of every node, indexed like [`nodes`](Self::nodes).
    pub fn degrees(&self) -> Vec<usize> {
        self.adjacency.iter().map(Vec::len).collect()
    }
}

/// Build the ego graph around `seed`.
///
/// Links `seed` to every friend, then adds one edge per relation row. A row
/// joining a person to themselves is skipped and recorded as a warning. The
/// seed appearing among its own friends is rejected outright, since that
/// points at an upstream data error.
pub fn build(
    seed: &Identifier,
    friend_ids: &[Identifier],
    relation_rows: &[RelationRow],
    diagnostics: &mut Diagnostics,
) -> Result<SocialGraph> {
    if friend_ids.contains(seed) {
        return Err(FriendGraphError::InvalidArgument(format!(
            "seed {seed} appears in its own friend list"
        )));
    }

    let mut graph = SocialGraph::new();
    graph.add_node(seed);

    for friend in friend_ids {
        graph.add_edge(seed, friend);
    }

    let mut repeated = 0usize;
    for row in relation_rows {
        if row.is_self_loop() {
            diagnostics.record(DiagnosticWarning::SelfLoopDiscarded {
                uid: row.id_a.clone(),
            });
            continue;
        }
        if graph.add_edge(&row.id_a, &row.id_b) == EdgeInsert::AlreadyPresent {
            repeated += 1;
        }
    }

    tracing::debug!(
        seed = %seed,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        repeated_rows = repeated,
        "Built friend graph"
    );

    Ok(graph)
}

/// Count edges stored in both directions.
///
/// Lists every edge directionally and counts those whose reverse is also
/// listed. Canonical storage makes this zero; it exists as a self-check.
pub fn duplicate_edge_count(graph: &SocialGraph) -> usize {
    let directed: HashSet<(&Identifier, &Identifier)> = graph.edges().collect();
    graph
        .edges()
        .filter(|&(a, b)| a != b && directed.contains(&(b, a)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(raw: &[&str]) -> Vec<Identifier> {
        raw.iter().map(|s| Identifier::from(*s)).collect()
    }

    #[test]
    fn test_seed_and_friends_only() {
        let mut diagnostics = Diagnostics::new();
        let graph = build(
            &Identifier::from("S"),
            &ids(&["A", "B", "C"]),
            &[],
            &mut diagnostics,
        )
        .unwrap();

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.degree(&Identifier::from("S")), Some(3));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_seed_in_friends_rejected() {
        let err = build(
            &Identifier::from("S"),
            &ids(&["A", "S"]),
            &[],
            &mut Diagnostics::new(),
        )
        .unwrap_err();
        assert!(matches!(err, FriendGraphError::InvalidArgument(_)));
    }

    #[test]
    fn test_reversed_rows_collapse_to_one_edge() {
        let rows = vec![RelationRow::new("A", "B"), RelationRow::new("B", "A")];
        let graph = build(
            &Identifier::from("S"),
            &ids(&["A"]),
            &rows,
            &mut Diagnostics::new(),
        )
        .unwrap();

        assert_eq!(graph.edge_count(), 2);
        let edges: Vec<(&str, &str)> = graph
            .edges()
            .map(|(a, b)| (a.as_str(), b.as_str()))
            .collect();
        assert_eq!(edges, vec![("S", "A"), ("A", "B")]);
        assert_eq!(duplicate_edge_count(&graph), 0);
    }

    #[test]
    fn test_self_loop_row_skipped_with_warning() {
        let rows = vec![RelationRow::new("A", "A"), RelationRow::new("A", "B")];
        let mut diagnostics = Diagnostics::new();
        let graph = build(&Identifier::from("S"), &ids(&["A", "B"]), &rows, &mut diagnostics)
            .unwrap();

        assert_eq!(graph.edge_count(), 3);
        assert!(!graph.contains_edge(&Identifier::from("A"), &Identifier::from("A")));
        assert_eq!(
            diagnostics.warnings(),
            &[DiagnosticWarning::SelfLoopDiscarded {
                uid: Identifier::from("A")
            }]
        );
    }

    #[test]
    fn test_self_loop_row_for_unknown_person_adds_no_node() {
        let rows = vec![RelationRow::new("Z", "Z")];
        let mut diagnostics = Diagnostics::new();
        let graph = build(&Identifier::from("S"), &ids(&["A"]), &rows, &mut diagnostics).unwrap();

        assert!(!graph.contains_node(&Identifier::from("Z")));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_rows_may_introduce_new_nodes() {
        let rows = vec![RelationRow::new("A", "X")];
        let graph = build(
            &Identifier::from("S"),
            &ids(&["A"]),
            &rows,
            &mut Diagnostics::new(),
        )
        .unwrap();

        assert!(graph.contains_node(&Identifier::from("X")));
        assert_eq!(graph.neighbors(&Identifier::from("X")), vec![&Identifier::from("A")]);
    }

    #[test]
    fn test_add_edge_outcomes() {
        let mut graph = SocialGraph::new();
        let (a, b) = (Identifier::from("a"), Identifier::from("b"));

        assert_eq!(graph.add_edge(&a, &b), EdgeInsert::Added);
        assert_eq!(graph.add_edge(&b, &a), EdgeInsert::AlreadyPresent);
        assert_eq!(graph.add_edge(&a, &a), EdgeInsert::SelfLoop);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.degrees(), vec![1, 1]);
    }

    #[test]
    fn test_self_loop_does_not_add_node() {
        let mut graph = SocialGraph::new();
        graph.add_edge(&Identifier::from("z"), &Identifier::from("z"));
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_unknown_node_lookups() {
        let graph = SocialGraph::new();
        let ghost = Identifier::from("ghost");
        assert_eq!(graph.degree(&ghost), None);
        assert!(graph.neighbors(&ghost).is_empty());
        assert!(!graph.contains_edge(&ghost, &ghost));
    }

    proptest! {
        #[test]
        fn prop_no_self_loops_or_duplicates(
            pairs in proptest::collection::vec((0u8..12, 0u8..12), 0..80),
        ) {
            let rows: Vec<RelationRow> = pairs
                .iter()
                .map(|(a, b)| RelationRow::new(a.to_string(), b.to_string()))
                .collect();
            let mut diagnostics = Diagnostics::new();
            let graph = build(&Identifier::from("seed"), &[], &rows, &mut diagnostics).unwrap();

            let distinct: HashSet<(u8, u8)> = pairs
                .iter()
                .filter(|(a, b)| a != b)
                .map(|&(a, b)| (a.min(b), a.max(b)))
                .collect();
            let self_loops = pairs.iter().filter(|(a, b)| a == b).count();

            prop_assert_eq!(graph.edge_count(), distinct.len());
            prop_assert_eq!(diagnostics.len(), self_loops);
            prop_assert!(graph.edges().all(|(a, b)| a != b));
            prop_assert_eq!(duplicate_edge_count(&graph), 0);
        }
    }
}
