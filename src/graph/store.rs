//! In-memory hypergraph store.
//!
//! Holds the node map, edge map, and the node → incident-edges index, updated
//! together. Mutation goes through `&mut self`: the store is a single explicitly
//! owned value, and callers sharing it across threads must add their own
//! synchronization (pure queries only ever take `&self`).
//!
//! `BTreeMap` keeps scan order deterministic, so repeated queries over an
//! unchanged store return identical results.

use std::collections::BTreeMap;

use crate::error::GraphError;

use super::schema::{self, ValidationReport};
use super::{LegalHyperedge, LegalNode};

/// Result type for graph operations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// The legal knowledge hypergraph.
///
/// Append-mostly: nodes and edges are created once and updated only by
/// upsert-on-id; nothing is deleted during normal operation.
#[derive(Default)]
pub struct Hypergraph {
    nodes: BTreeMap<String, LegalNode>,
    edges: BTreeMap<String, LegalHyperedge>,
    /// Node id → incident edge ids, in edge insertion order.
    incidence: BTreeMap<String, Vec<String>>,
}

impl Hypergraph {
    /// Create a new empty hypergraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, overwriting any existing node with the same id.
    ///
    /// Schema violations are warnings, not errors: the node is admitted either
    /// way and the report is returned for the caller to act on.
    pub fn upsert_node(&mut self, node: LegalNode) -> ValidationReport {
        let report = schema::validate(&node);
        if !report.ok {
            tracing::warn!(node = %node.id, warnings = ?report.warnings, "schema warnings on upsert");
        }
        tracing::debug!(node = %node.id, kind = %node.kind, level = node.inference_level, "upsert node");
        self.incidence.entry(node.id.clone()).or_default();
        self.nodes.insert(node.id.clone(), node);
        report
    }

    /// Insert a hyperedge, overwriting any existing edge with the same id.
    ///
    /// Every member id must resolve to an existing node; a dangling reference
    /// is rejected and the store is left unchanged.
    pub fn insert_edge(&mut self, edge: LegalHyperedge) -> GraphResult<()> {
        for member in &edge.nodes {
            if !self.nodes.contains_key(member) {
                return Err(GraphError::DanglingNode {
                    edge_id: edge.id.clone(),
                    node_id: member.clone(),
                });
            }
        }

        // Upsert on id: drop the old edge's index entries before re-indexing.
        if let Some(old) = self.edges.remove(&edge.id) {
            for member in &old.nodes {
                if let Some(incident) = self.incidence.get_mut(member) {
                    incident.retain(|e| e != &old.id);
                }
            }
        }

        for member in &edge.nodes {
            let incident = self.incidence.entry(member.clone()).or_default();
            if !incident.contains(&edge.id) {
                incident.push(edge.id.clone());
            }
        }

        tracing::debug!(edge = %edge.id, relation = %edge.relation_kind, members = edge.nodes.len(), "insert edge");
        self.edges.insert(edge.id.clone(), edge);
        Ok(())
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&LegalNode> {
        self.nodes.get(id)
    }

    /// Look up an edge by id.
    pub fn edge(&self, id: &str) -> Option<&LegalHyperedge> {
        self.edges.get(id)
    }

    /// Whether a node with the given id exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Edges incident to a node, in insertion order. Unknown ids yield nothing.
    pub fn edges_of(&self, node_id: &str) -> Vec<&LegalHyperedge> {
        self.incidence
            .get(node_id)
            .map(|ids| ids.iter().filter_map(|id| self.edges.get(id)).collect())
            .unwrap_or_default()
    }

    /// Distinct neighbor ids of a node (co-members of incident edges), in
    /// discovery order.
    pub fn neighbors_of(&self, node_id: &str) -> Vec<String> {
        let mut neighbors: Vec<String> = Vec::new();
        for edge in self.edges_of(node_id) {
            for member in &edge.nodes {
                if member != node_id && !neighbors.contains(member) {
                    neighbors.push(member.clone());
                }
            }
        }
        neighbors
    }

    /// Iterate all nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &LegalNode> {
        self.nodes.values()
    }

    /// Iterate all edges in id order.
    pub fn edges(&self) -> impl Iterator<Item = &LegalHyperedge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Summary statistics: counts, per-kind breakdowns, and average degree
    /// (mean incidence-list length across all nodes).
    pub fn stats(&self) -> GraphStats {
        let mut nodes_by_kind: BTreeMap<String, usize> = BTreeMap::new();
        for node in self.nodes.values() {
            *nodes_by_kind.entry(node.kind.as_str().to_string()).or_insert(0) += 1;
        }

        let mut edges_by_relation: BTreeMap<String, usize> = BTreeMap::new();
        for edge in self.edges.values() {
            *edges_by_relation
                .entry(edge.relation_kind.as_str().to_string())
                .or_insert(0) += 1;
        }

        let avg_degree = if self.nodes.is_empty() {
            0.0
        } else {
            let total: usize = self
                .nodes
                .keys()
                .map(|id| self.incidence.get(id).map_or(0, Vec::len))
                .sum();
            total as f64 / self.nodes.len() as f64
        };

        GraphStats {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            nodes_by_kind,
            edges_by_relation,
            avg_degree,
        }
    }
}

impl std::fmt::Debug for Hypergraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hypergraph")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}

/// Summary information about a hypergraph.
#[derive(Debug, Clone, serde::Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes_by_kind: BTreeMap<String, usize>,
    pub edges_by_relation: BTreeMap<String, usize>,
    pub avg_degree: f64,
}

impl std::fmt::Display for GraphStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "jurisgraph stats")?;
        writeln!(f, "  nodes:       {}", self.node_count)?;
        writeln!(f, "  edges:       {}", self.edge_count)?;
        writeln!(f, "  avg degree:  {:.2}", self.avg_degree)?;
        for (kind, count) in &self.nodes_by_kind {
            writeln!(f, "  {kind:<12} {count}")?;
        }
        Ok(())
    }
}
