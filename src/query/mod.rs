//! Query engine: pure reads over the hypergraph.
//!
//! Every operation takes `&Hypergraph`, never mutates it, and returns a
//! serializable [`QueryResult`] whose metadata describes the query that
//! produced it (type, filters, counts). Unknown ids yield empty results,
//! not errors.

pub mod search;
pub mod similarity;
pub mod subgraph;
pub mod traverse;

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Value, json};

use crate::graph::{LegalHyperedge, LegalNode, NodeKind};

pub use search::{query_by_inference_level, query_nodes};
pub use similarity::{SimilarityConfig, query_similar_nodes};
pub use subgraph::query_subgraph;
pub use traverse::{query_neighbors, query_path, query_reasoning_chain};

/// Result of any query: matched nodes, matched edges, and a free-form
/// metadata map describing the query.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub nodes: Vec<LegalNode>,
    pub edges: Vec<LegalHyperedge>,
    pub metadata: BTreeMap<String, Value>,
}

impl QueryResult {
    /// Create an empty result tagged with the producing query's type.
    pub fn new(query_type: &str) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert("query_type".to_string(), json!(query_type));
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            metadata,
        }
    }

    /// Attach a metadata entry.
    pub fn with_meta(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    /// Record final node/edge counts in metadata.
    pub fn finish(mut self) -> Self {
        self.metadata
            .insert("node_count".to_string(), json!(self.nodes.len()));
        self.metadata
            .insert("edge_count".to_string(), json!(self.edges.len()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Filters for [`query_nodes`]. Unspecified filters are no-ops.
#[derive(Debug, Clone)]
pub struct NodeFilter {
    pub kind: Option<NodeKind>,
    pub jurisdiction: Option<String>,
    /// Case-insensitive regex over `name`; falls back to substring matching
    /// when the pattern does not compile.
    pub name_pattern: Option<String>,
    /// Exact-match requirements over node properties.
    pub properties: BTreeMap<String, Value>,
    pub max_results: usize,
}

impl Default for NodeFilter {
    fn default() -> Self {
        Self {
            kind: None,
            jurisdiction: None,
            name_pattern: None,
            properties: BTreeMap::new(),
            max_results: 10_000,
        }
    }
}
