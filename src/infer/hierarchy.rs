//! Views over the inference levels of a graph.

use std::collections::BTreeMap;

use crate::graph::store::Hypergraph;
use crate::graph::{LegalNode, RelationKind};

/// Group node ids by inference level.
///
/// Level 0 is base knowledge; each higher level was derived from the levels
/// below it. Ids within a level come back sorted.
pub fn build_hierarchy(graph: &Hypergraph) -> BTreeMap<u8, Vec<String>> {
    let mut levels: BTreeMap<u8, Vec<String>> = BTreeMap::new();
    for node in graph.nodes() {
        levels
            .entry(node.inference_level)
            .or_default()
            .push(node.id.clone());
    }
    // Nodes iterate in id order already, but make the contract explicit.
    for ids in levels.values_mut() {
        ids.sort();
    }
    levels
}

/// Trace a derived node back to base knowledge.
///
/// Follows `infers_from` edges in which the current node is the derived
/// member, stepping to the lowest-level source each time (ties broken by
/// id). Returns the chain ordered base first, the queried node last; a node
/// with no provenance yields a chain of just itself. Unknown ids yield an
/// empty chain.
pub fn inference_chain(graph: &Hypergraph, node_id: &str) -> Vec<LegalNode> {
    let Some(start) = graph.node(node_id) else {
        return Vec::new();
    };

    let mut chain = vec![start.clone()];
    let mut current = node_id.to_string();
    let mut visited = std::collections::BTreeSet::new();
    visited.insert(current.clone());

    loop {
        let mut parent: Option<&LegalNode> = None;
        for edge in graph.edges_of(&current) {
            if edge.relation_kind != RelationKind::InfersFrom
                || edge.source() != current
            {
                continue;
            }
            for member in edge.nodes.iter().skip(1) {
                let Some(node) = graph.node(member) else {
                    continue;
                };
                if visited.contains(&node.id) {
                    continue;
                }
                let better = parent.is_none_or(|p| {
                    (node.inference_level, &node.id) < (p.inference_level, &p.id)
                });
                if better {
                    parent = Some(node);
                }
            }
        }
        match parent {
            Some(node) => {
                visited.insert(node.id.clone());
                current = node.id.clone();
                chain.push(node.clone());
            }
            None => break,
        }
    }

    chain.reverse();
    chain
}
