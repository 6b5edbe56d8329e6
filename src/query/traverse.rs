//! Bounded traversals over hyperedge membership.
//!
//! Adjacency is induced by co-membership: two nodes are neighbors when some
//! hyperedge contains both. All walks carry an explicit hop/depth bound,
//! which is the caller's latency control — there is no other cancellation.

use std::collections::{HashMap, HashSet, VecDeque};

use serde_json::json;

use crate::graph::store::Hypergraph;
use crate::graph::{LegalHyperedge, RelationKind};

use super::QueryResult;

/// Breadth-first neighborhood of a node within `max_hops`.
///
/// Visits each node at most once; the start node itself is not included in
/// the returned nodes. An unknown `node_id` returns an empty result.
pub fn query_neighbors(
    graph: &Hypergraph,
    node_id: &str,
    relation_kind: Option<RelationKind>,
    max_hops: usize,
) -> QueryResult {
    let mut result = QueryResult::new("neighbors")
        .with_meta("start", json!(node_id))
        .with_meta("max_hops", json!(max_hops));
    if let Some(relation) = relation_kind {
        result = result.with_meta("relation_kind", json!(relation.as_str()));
    }

    if !graph.contains_node(node_id) {
        return result.finish();
    }

    let mut visited: HashSet<String> = HashSet::new();
    let mut seen_edges: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<(String, usize)> = VecDeque::new();

    visited.insert(node_id.to_string());
    queue.push_back((node_id.to_string(), 0));

    while let Some((current, hops)) = queue.pop_front() {
        if hops >= max_hops {
            continue;
        }
        for edge in graph.edges_of(&current) {
            if let Some(relation) = relation_kind {
                if edge.relation_kind != relation {
                    continue;
                }
            }
            if seen_edges.insert(edge.id.clone()) {
                result.edges.push(edge.clone());
            }
            for member in &edge.nodes {
                if visited.insert(member.clone()) {
                    if let Some(node) = graph.node(member) {
                        result.nodes.push(node.clone());
                    }
                    queue.push_back((member.clone(), hops + 1));
                }
            }
        }
    }

    result.finish()
}

/// Shortest path (by hop count) between two nodes, bounded by `max_depth`.
///
/// BFS over the hyperedge-induced adjacency returns the first path found,
/// which is shortest in hops. No path within the bound yields an empty
/// result with `path_found = false` in metadata.
pub fn query_path(
    graph: &Hypergraph,
    source_id: &str,
    target_id: &str,
    max_depth: usize,
) -> QueryResult {
    let mut result = QueryResult::new("path")
        .with_meta("source", json!(source_id))
        .with_meta("target", json!(target_id));

    if !graph.contains_node(source_id) || !graph.contains_node(target_id) {
        return result.with_meta("path_found", json!(false)).finish();
    }

    if source_id == target_id {
        if let Some(node) = graph.node(source_id) {
            result.nodes.push(node.clone());
        }
        return result
            .with_meta("path_found", json!(true))
            .with_meta("hops", json!(0))
            .finish();
    }

    // predecessor: node → (previous node, edge that reached it)
    let mut predecessor: HashMap<String, (String, String)> = HashMap::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<(String, usize)> = VecDeque::new();

    visited.insert(source_id.to_string());
    queue.push_back((source_id.to_string(), 0));

    let mut found = false;
    'search: while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        for edge in graph.edges_of(&current) {
            for member in &edge.nodes {
                if !visited.insert(member.clone()) {
                    continue;
                }
                predecessor.insert(member.clone(), (current.clone(), edge.id.clone()));
                if member == target_id {
                    found = true;
                    break 'search;
                }
                queue.push_back((member.clone(), depth + 1));
            }
        }
    }

    if !found {
        return result.with_meta("path_found", json!(false)).finish();
    }

    // Walk predecessors back from the target.
    let mut path_nodes: Vec<String> = vec![target_id.to_string()];
    let mut path_edges: Vec<String> = Vec::new();
    let mut cursor = target_id.to_string();
    while let Some((prev, edge_id)) = predecessor.get(&cursor) {
        path_edges.push(edge_id.clone());
        path_nodes.push(prev.clone());
        cursor = prev.clone();
    }
    path_nodes.reverse();
    path_edges.reverse();

    let hops = path_nodes.len() - 1;
    for id in &path_nodes {
        if let Some(node) = graph.node(id) {
            result.nodes.push(node.clone());
        }
    }
    let mut seen: HashSet<&String> = HashSet::new();
    for id in &path_edges {
        if seen.insert(id) {
            if let Some(edge) = graph.edge(id) {
                result.edges.push(edge.clone());
            }
        }
    }

    result
        .with_meta("path_found", json!(true))
        .with_meta("hops", json!(hops))
        .finish()
}

/// Longest chain of `depends_on` edges outward from `start_id`.
///
/// Depth-first walk following only `depends_on` edges where the current node
/// is in source position. Among all terminal chains (dead end or depth bound)
/// the longest wins; ties go to discovery order.
pub fn query_reasoning_chain(graph: &Hypergraph, start_id: &str, max_depth: usize) -> QueryResult {
    let mut result = QueryResult::new("reasoning_chain")
        .with_meta("start", json!(start_id))
        .with_meta("max_depth", json!(max_depth));

    if !graph.contains_node(start_id) {
        return result.finish();
    }

    let mut best_nodes: Vec<String> = Vec::new();
    let mut best_edges: Vec<String> = Vec::new();
    let mut path = vec![start_id.to_string()];
    let mut edges = Vec::new();
    walk(graph, start_id, max_depth, &mut path, &mut edges, &mut best_nodes, &mut best_edges);

    for id in &best_nodes {
        if let Some(node) = graph.node(id) {
            result.nodes.push(node.clone());
        }
    }
    for id in &best_edges {
        if let Some(edge) = graph.edge(id) {
            result.edges.push(edge.clone());
        }
    }

    let chain_length = result.nodes.len();
    result.with_meta("chain_length", json!(chain_length)).finish()
}

fn walk(
    graph: &Hypergraph,
    current: &str,
    remaining: usize,
    path: &mut Vec<String>,
    edges: &mut Vec<String>,
    best_nodes: &mut Vec<String>,
    best_edges: &mut Vec<String>,
) {
    let outgoing: Vec<&LegalHyperedge> = if remaining == 0 {
        Vec::new()
    } else {
        graph
            .edges_of(current)
            .into_iter()
            .filter(|e| e.relation_kind == RelationKind::DependsOn && e.source() == current)
            .collect()
    };

    let mut extended = false;
    for edge in outgoing {
        for member in edge.nodes.iter().skip(1) {
            if path.contains(member) {
                continue;
            }
            extended = true;
            path.push(member.clone());
            edges.push(edge.id.clone());
            walk(graph, member, remaining - 1, path, edges, best_nodes, best_edges);
            edges.pop();
            path.pop();
        }
    }

    // Terminal chain: dead end or depth bound. Strictly-longer keeps the
    // first chain discovered on ties.
    if !extended && path.len() > best_nodes.len() {
        *best_nodes = path.clone();
        *best_edges = edges.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{LegalNode, NodeKind};

    fn concept(id: &str) -> LegalNode {
        LegalNode::new(id, NodeKind::Concept, id)
    }

    fn link(graph: &mut Hypergraph, id: &str, relation: RelationKind, members: &[&str]) {
        let edge = LegalHyperedge::new(id, relation, members.iter().map(|m| m.to_string()).collect())
            .unwrap();
        graph.insert_edge(edge).unwrap();
    }

    /// A --e1-- B --e2-- C, plus disconnected D.
    fn chain_graph() -> Hypergraph {
        let mut graph = Hypergraph::new();
        for id in ["a", "b", "c", "d"] {
            graph.upsert_node(concept(id));
        }
        link(&mut graph, "e1", RelationKind::Cites, &["a", "b"]);
        link(&mut graph, "e2", RelationKind::Cites, &["b", "c"]);
        graph
    }

    #[test]
    fn neighbors_one_hop() {
        let graph = chain_graph();
        let result = query_neighbors(&graph, "a", None, 1);
        assert_eq!(result.nodes.len(), 1);
        assert_eq!(result.nodes[0].id, "b");
        assert_eq!(result.edges.len(), 1);
    }

    #[test]
    fn neighbors_two_hops() {
        let graph = chain_graph();
        let result = query_neighbors(&graph, "a", None, 2);
        let ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert_eq!(result.edges.len(), 2);
    }

    #[test]
    fn neighbors_relation_filter() {
        let mut graph = chain_graph();
        link(&mut graph, "e3", RelationKind::Supports, &["a", "d"]);

        let result = query_neighbors(&graph, "a", Some(RelationKind::Supports), 1);
        assert_eq!(result.nodes.len(), 1);
        assert_eq!(result.nodes[0].id, "d");
    }

    #[test]
    fn neighbors_unknown_node_is_empty() {
        let graph = chain_graph();
        let result = query_neighbors(&graph, "ghost", None, 2);
        assert!(result.is_empty());
    }

    #[test]
    fn path_three_node_chain() {
        let graph = chain_graph();
        let result = query_path(&graph, "a", "c", 5);
        assert_eq!(result.metadata.get("path_found"), Some(&json!(true)));
        assert_eq!(result.metadata.get("hops"), Some(&json!(2)));
        let ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(result.edges.len(), 2);
    }

    #[test]
    fn path_to_disconnected_node_not_found() {
        let graph = chain_graph();
        let result = query_path(&graph, "a", "d", 5);
        assert_eq!(result.metadata.get("path_found"), Some(&json!(false)));
        assert!(result.nodes.is_empty());
    }

    #[test]
    fn path_respects_depth_bound() {
        let graph = chain_graph();
        let result = query_path(&graph, "a", "c", 1);
        assert_eq!(result.metadata.get("path_found"), Some(&json!(false)));
    }

    #[test]
    fn path_to_self() {
        let graph = chain_graph();
        let result = query_path(&graph, "a", "a", 5);
        assert_eq!(result.metadata.get("path_found"), Some(&json!(true)));
        assert_eq!(result.metadata.get("hops"), Some(&json!(0)));
        assert_eq!(result.nodes.len(), 1);
    }

    #[test]
    fn path_through_shared_hyperedge() {
        // One hyperedge containing three nodes: every pair is one hop apart.
        let mut graph = Hypergraph::new();
        for id in ["x", "y", "z"] {
            graph.upsert_node(concept(id));
        }
        link(&mut graph, "e", RelationKind::Supports, &["x", "y", "z"]);

        let result = query_path(&graph, "x", "z", 5);
        assert_eq!(result.metadata.get("hops"), Some(&json!(1)));
    }

    #[test]
    fn reasoning_chain_follows_longest_dependency_run() {
        let mut graph = Hypergraph::new();
        for id in ["a", "b", "c", "d", "e"] {
            graph.upsert_node(concept(id));
        }
        // a depends on b depends on c depends on d (long run),
        // and a depends on e (short run).
        link(&mut graph, "d1", RelationKind::DependsOn, &["a", "b"]);
        link(&mut graph, "d2", RelationKind::DependsOn, &["b", "c"]);
        link(&mut graph, "d3", RelationKind::DependsOn, &["c", "d"]);
        link(&mut graph, "d4", RelationKind::DependsOn, &["a", "e"]);

        let result = query_reasoning_chain(&graph, "a", 5);
        let ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(result.metadata.get("chain_length"), Some(&json!(4)));
        assert_eq!(result.edges.len(), 3);
    }

    #[test]
    fn reasoning_chain_only_follows_source_position() {
        let mut graph = Hypergraph::new();
        for id in ["a", "b"] {
            graph.upsert_node(concept(id));
        }
        // b depends on a: the edge is incident to a, but not outward from it.
        link(&mut graph, "d1", RelationKind::DependsOn, &["b", "a"]);

        let result = query_reasoning_chain(&graph, "a", 5);
        assert_eq!(result.nodes.len(), 1);
        assert_eq!(result.nodes[0].id, "a");
    }

    #[test]
    fn reasoning_chain_survives_cycles() {
        let mut graph = Hypergraph::new();
        for id in ["a", "b", "c"] {
            graph.upsert_node(concept(id));
        }
        link(&mut graph, "d1", RelationKind::DependsOn, &["a", "b"]);
        link(&mut graph, "d2", RelationKind::DependsOn, &["b", "c"]);
        link(&mut graph, "d3", RelationKind::DependsOn, &["c", "a"]);

        let result = query_reasoning_chain(&graph, "a", 10);
        let ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
