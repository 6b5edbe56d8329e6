//! Closed-subgraph extraction.

use serde_json::json;

use crate::graph::store::Hypergraph;

use super::QueryResult;

/// Return exactly the requested nodes, optionally expanded by one hop.
///
/// An edge is included only when **all** of its members are in the resulting
/// node set (closed-subgraph semantics, not edge-induced). Unknown ids are
/// silently skipped.
pub fn query_subgraph(
    graph: &Hypergraph,
    node_ids: &[String],
    include_edges: bool,
    expand_neighbors: bool,
) -> QueryResult {
    let mut result = QueryResult::new("subgraph")
        .with_meta("requested", json!(node_ids.len()))
        .with_meta("expanded", json!(expand_neighbors));

    // Requested nodes, in request order, deduplicated.
    let mut selected: Vec<String> = Vec::new();
    for id in node_ids {
        if graph.contains_node(id) && !selected.contains(id) {
            selected.push(id.clone());
        }
    }

    if expand_neighbors {
        let mut expansion: Vec<String> = Vec::new();
        for id in &selected {
            for neighbor in graph.neighbors_of(id) {
                if !selected.contains(&neighbor) && !expansion.contains(&neighbor) {
                    expansion.push(neighbor);
                }
            }
        }
        selected.extend(expansion);
    }

    for id in &selected {
        if let Some(node) = graph.node(id) {
            result.nodes.push(node.clone());
        }
    }

    if include_edges {
        result.edges = graph
            .edges()
            .filter(|edge| edge.nodes.iter().all(|m| selected.contains(m)))
            .cloned()
            .collect();
    }

    result.finish()
}
