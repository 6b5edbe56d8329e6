//! Structural and textual node similarity.
//!
//! Scores every other node against a target by a fixed weighted sum:
//! kind match, Jaccard similarity of whitespace-tokenized content, and
//! Jaccard similarity of the two nodes' neighbor-id sets.

use std::collections::{BTreeMap, HashSet};

use serde_json::json;

use crate::graph::LegalNode;
use crate::graph::store::Hypergraph;

use super::QueryResult;

/// Weights and cut-offs for [`query_similar_nodes`].
#[derive(Debug, Clone)]
pub struct SimilarityConfig {
    /// Contribution of an exact kind match.
    pub kind_weight: f64,
    /// Maximum contribution of content-token overlap.
    pub content_weight: f64,
    /// Maximum contribution of shared neighborhood.
    pub neighbor_weight: f64,
    /// Minimum total score to keep a candidate.
    pub threshold: f64,
    pub max_results: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            kind_weight: 0.3,
            content_weight: 0.4,
            neighbor_weight: 0.3,
            threshold: 0.3,
            max_results: 10,
        }
    }
}

/// Jaccard similarity: |intersection| / |union|, 0 for two empty sets.
fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

fn content_tokens(node: &LegalNode) -> HashSet<String> {
    node.content
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

/// Rank all other nodes by similarity to `node_id`.
///
/// Candidates scoring at least `threshold` are kept, sorted by score
/// descending (id ascending on ties) and truncated to `max_results`.
/// Per-candidate scores are reported in metadata.
pub fn query_similar_nodes(
    graph: &Hypergraph,
    node_id: &str,
    config: &SimilarityConfig,
) -> QueryResult {
    let mut result = QueryResult::new("similar_nodes")
        .with_meta("target", json!(node_id))
        .with_meta("threshold", json!(config.threshold));

    let Some(target) = graph.node(node_id) else {
        return result.finish();
    };

    let target_tokens = content_tokens(target);
    let target_neighbors: HashSet<String> = graph.neighbors_of(node_id).into_iter().collect();

    let mut scored: Vec<(f64, &LegalNode)> = Vec::new();
    for candidate in graph.nodes() {
        if candidate.id == node_id {
            continue;
        }
        let mut score = 0.0;
        if candidate.kind == target.kind {
            score += config.kind_weight;
        }
        score += config.content_weight * jaccard(&target_tokens, &content_tokens(candidate));
        let candidate_neighbors: HashSet<String> =
            graph.neighbors_of(&candidate.id).into_iter().collect();
        score += config.neighbor_weight * jaccard(&target_neighbors, &candidate_neighbors);

        if score >= config.threshold {
            scored.push((score, candidate));
        }
    }

    scored.sort_by(|(sa, na), (sb, nb)| {
        sb.partial_cmp(sa)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| na.id.cmp(&nb.id))
    });
    scored.truncate(config.max_results);

    let mut scores: BTreeMap<String, serde_json::Value> = BTreeMap::new();
    for (score, node) in &scored {
        scores.insert(node.id.clone(), json!(score));
        result.nodes.push((*node).clone());
    }

    result.with_meta("scores", json!(scores)).finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{LegalHyperedge, NodeKind, RelationKind};

    fn case(id: &str, content: &str) -> LegalNode {
        LegalNode::new(id, NodeKind::Case, id)
            .with_jurisdiction("za")
            .with_content(content)
    }

    #[test]
    fn jaccard_basics() {
        let a: HashSet<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
        let b: HashSet<String> = ["y", "z"].iter().map(|s| s.to_string()).collect();
        assert!((jaccard(&a, &b) - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(jaccard(&HashSet::new(), &HashSet::new()), 0.0);
    }

    #[test]
    fn identical_content_and_kind_scores_highest() {
        let mut graph = Hypergraph::new();
        graph.upsert_node(case("target", "breach of contract damages"));
        graph.upsert_node(case("twin", "breach of contract damages"));
        graph.upsert_node(case("other", "murder trial verdict"));
        graph.upsert_node(
            LegalNode::new("concept", NodeKind::Concept, "damages")
                .with_content("breach of contract damages"),
        );

        let result = query_similar_nodes(&graph, "target", &SimilarityConfig::default());
        // twin: kind 0.3 + content 0.4 = 0.7. concept: content 0.4 only.
        assert_eq!(result.nodes[0].id, "twin");
        assert!(result.nodes.iter().any(|n| n.id == "concept"));
        assert!(!result.nodes.iter().any(|n| n.id == "other"));
    }

    #[test]
    fn kind_match_alone_equals_weight() {
        let mut graph = Hypergraph::new();
        graph.upsert_node(case("a", "alpha"));
        graph.upsert_node(case("b", "omega"));

        let result = query_similar_nodes(
            &graph,
            "a",
            &SimilarityConfig {
                threshold: 0.0,
                ..Default::default()
            },
        );
        let scores = result.metadata.get("scores").unwrap();
        assert!((scores["b"].as_f64().unwrap() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn shared_neighbors_contribute() {
        let mut graph = Hypergraph::new();
        graph.upsert_node(case("a", ""));
        graph.upsert_node(case("b", ""));
        graph.upsert_node(case("hub", ""));
        graph
            .insert_edge(
                LegalHyperedge::new("e1", RelationKind::Cites, vec!["a".into(), "hub".into()])
                    .unwrap(),
            )
            .unwrap();
        graph
            .insert_edge(
                LegalHyperedge::new("e2", RelationKind::Cites, vec!["b".into(), "hub".into()])
                    .unwrap(),
            )
            .unwrap();

        let result = query_similar_nodes(
            &graph,
            "a",
            &SimilarityConfig {
                threshold: 0.0,
                max_results: 10,
                ..Default::default()
            },
        );
        let scores = result.metadata.get("scores").unwrap();
        // b: kind 0.3 + neighbors {hub}/{hub} = 0.3·1.0 → 0.6.
        assert!((scores["b"].as_f64().unwrap() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn threshold_and_truncation() {
        let mut graph = Hypergraph::new();
        graph.upsert_node(case("target", "shared words here"));
        for i in 0..15 {
            graph.upsert_node(case(&format!("c{i:02}"), "shared words here"));
        }

        let result = query_similar_nodes(&graph, "target", &SimilarityConfig::default());
        assert_eq!(result.nodes.len(), 10);
    }

    #[test]
    fn unknown_target_is_empty() {
        let graph = Hypergraph::new();
        let result = query_similar_nodes(&graph, "ghost", &SimilarityConfig::default());
        assert!(result.is_empty());
    }
}
