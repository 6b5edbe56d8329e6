//! Linear filter scans over the node map.

use regex::RegexBuilder;
use serde_json::json;

use crate::graph::LegalNode;
use crate::graph::store::Hypergraph;

use super::{NodeFilter, QueryResult};

/// Filter all nodes by kind, jurisdiction, name pattern, and properties.
///
/// The name pattern is matched as a case-insensitive regex; if it fails to
/// compile it degrades to a case-insensitive substring match.
pub fn query_nodes(graph: &Hypergraph, filter: &NodeFilter) -> QueryResult {
    let name_matcher = filter.name_pattern.as_deref().map(|pattern| {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|_| pattern.to_lowercase())
    });

    let matches = |node: &LegalNode| -> bool {
        if let Some(kind) = filter.kind {
            if node.kind != kind {
                return false;
            }
        }
        if let Some(ref jurisdiction) = filter.jurisdiction {
            if &node.jurisdiction != jurisdiction {
                return false;
            }
        }
        if let Some(ref matcher) = name_matcher {
            let hit = match matcher {
                Ok(re) => re.is_match(&node.name),
                Err(needle) => node.name.to_lowercase().contains(needle),
            };
            if !hit {
                return false;
            }
        }
        filter
            .properties
            .iter()
            .all(|(key, value)| node.properties.get(key) == Some(value))
    };

    let mut result = QueryResult::new("nodes");
    result.nodes = graph
        .nodes()
        .filter(|n| matches(n))
        .take(filter.max_results)
        .cloned()
        .collect();

    if let Some(kind) = filter.kind {
        result = result.with_meta("kind", json!(kind.as_str()));
    }
    if let Some(ref jurisdiction) = filter.jurisdiction {
        result = result.with_meta("jurisdiction", json!(jurisdiction));
    }
    if let Some(ref pattern) = filter.name_pattern {
        result = result.with_meta("name_pattern", json!(pattern));
    }
    result.finish()
}

/// All nodes at the given inference level, in id order.
pub fn query_by_inference_level(graph: &Hypergraph, level: u8) -> QueryResult {
    let mut result = QueryResult::new("by_inference_level").with_meta("level", json!(level));
    result.nodes = graph
        .nodes()
        .filter(|n| n.inference_level == level)
        .cloned()
        .collect();
    result.finish()
}
