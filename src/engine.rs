//! The engine facade: one owned graph plus configuration, with loading,
//! querying and inference behind a single type.

use std::collections::BTreeMap;

use crate::error::JurisResult;
use crate::graph::store::{GraphStats, Hypergraph};
use crate::graph::{LegalNode, RelationKind};
use crate::infer::{self, InferenceConfig, InferenceResult};
use crate::loader::{self, LoadReport, LoaderConfig, SourceUnit};
use crate::query::{self, NodeFilter, QueryResult, SimilarityConfig};

/// Tunables for every subsystem, in one place.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub loader: LoaderConfig,
    pub inference: InferenceConfig,
    pub similarity: SimilarityConfig,
}

/// A legal knowledge engine: the hypergraph and the operations over it.
///
/// The engine owns its graph; callers mutate it only through `&mut self`
/// methods, so queries observe a quiescent graph.
#[derive(Debug, Default)]
pub struct Engine {
    config: EngineConfig,
    graph: Hypergraph,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            graph: Hypergraph::new(),
        }
    }

    /// Read access to the underlying graph.
    pub fn graph(&self) -> &Hypergraph {
        &self.graph
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Ingest one source text under a branch of law.
    pub fn load_unit(&mut self, branch: &str, text: &str) -> JurisResult<LoadReport> {
        loader::load_unit(&mut self.graph, branch, text, &self.config.loader)
    }

    /// Ingest a batch of source units, skipping the ones that fail.
    pub fn load_batch(&mut self, units: &[SourceUnit]) -> LoadReport {
        loader::load_batch(&mut self.graph, units, &self.config.loader)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn query_nodes(&self, filter: &NodeFilter) -> QueryResult {
        query::query_nodes(&self.graph, filter)
    }

    pub fn query_by_inference_level(&self, level: u8) -> QueryResult {
        query::query_by_inference_level(&self.graph, level)
    }

    pub fn query_neighbors(
        &self,
        node_id: &str,
        relation_kind: Option<RelationKind>,
        max_hops: usize,
    ) -> QueryResult {
        query::query_neighbors(&self.graph, node_id, relation_kind, max_hops)
    }

    pub fn query_path(&self, source_id: &str, target_id: &str, max_depth: usize) -> QueryResult {
        query::query_path(&self.graph, source_id, target_id, max_depth)
    }

    pub fn query_reasoning_chain(&self, start_id: &str, max_depth: usize) -> QueryResult {
        query::query_reasoning_chain(&self.graph, start_id, max_depth)
    }

    pub fn query_subgraph(
        &self,
        node_ids: &[String],
        include_edges: bool,
        expand_neighbors: bool,
    ) -> QueryResult {
        query::query_subgraph(&self.graph, node_ids, include_edges, expand_neighbors)
    }

    pub fn query_similar_nodes(&self, node_id: &str) -> QueryResult {
        query::query_similar_nodes(&self.graph, node_id, &self.config.similarity)
    }

    pub fn stats(&self) -> GraphStats {
        self.graph.stats()
    }

    // -----------------------------------------------------------------------
    // Inference
    // -----------------------------------------------------------------------

    /// Apply a general principle to a specific case, committing the
    /// conclusion to the graph on success.
    pub fn infer_deductive(
        &mut self,
        general_id: &str,
        specific_id: &str,
        target_level: u8,
    ) -> InferenceResult {
        let Some((general, specific)) = self
            .graph
            .node(general_id)
            .cloned()
            .zip(self.graph.node(specific_id).cloned())
        else {
            return InferenceResult::failed(format!(
                "unknown node in '{general_id}' / '{specific_id}'"
            ));
        };
        let result = infer::deduce(
            &self.config.inference,
            &[&general, &specific],
            target_level,
        );
        self.commit(result)
    }

    /// Generalize a pattern across the given source nodes.
    pub fn infer_inductive(&mut self, source_ids: &[String], target_level: u8) -> InferenceResult {
        let Some(sources) = self.resolve(source_ids) else {
            return InferenceResult::failed("one or more source nodes are unknown");
        };
        let refs: Vec<&LegalNode> = sources.iter().collect();
        let result = infer::induce(&self.config.inference, &refs, target_level);
        self.commit(result)
    }

    /// Hypothesize the best explanation for a set of observations.
    pub fn infer_abductive(
        &mut self,
        observation_ids: &[String],
        target_level: u8,
    ) -> InferenceResult {
        let Some(observations) = self.resolve(observation_ids) else {
            return InferenceResult::failed("one or more observation nodes are unknown");
        };
        let refs: Vec<&LegalNode> = observations.iter().collect();
        let result = infer::abduce(&self.config.inference, &refs, target_level);
        self.commit(result)
    }

    /// Transfer a principle into another domain of law.
    pub fn infer_analogical(
        &mut self,
        source_id: &str,
        target_domain: &str,
        target_level: u8,
    ) -> InferenceResult {
        let Some(source) = self.graph.node(source_id).cloned() else {
            return InferenceResult::failed(format!("unknown source node '{source_id}'"));
        };
        let result = infer::analogize(
            &self.config.inference,
            &source,
            target_domain,
            target_level,
        );
        self.commit(result)
    }

    /// Group node ids by inference level.
    pub fn hierarchy(&self) -> BTreeMap<u8, Vec<String>> {
        infer::build_hierarchy(&self.graph)
    }

    /// Trace a derived node back to base knowledge.
    pub fn inference_chain(&self, node_id: &str) -> Vec<LegalNode> {
        infer::inference_chain(&self.graph, node_id)
    }

    fn resolve(&self, ids: &[String]) -> Option<Vec<LegalNode>> {
        ids.iter()
            .map(|id| self.graph.node(id).cloned())
            .collect()
    }

    /// Commit a successful inference: the derived principle plus its
    /// supporting edges. Failed results pass through untouched.
    fn commit(&mut self, result: InferenceResult) -> InferenceResult {
        let Some(principle) = &result.principle else {
            return result;
        };
        self.graph.upsert_node(principle.clone());
        for edge in &result.supporting_edges {
            if let Err(err) = self.graph.insert_edge(edge.clone()) {
                tracing::warn!(edge = %edge.id, error = %err, "dropping supporting edge");
            }
        }
        tracing::info!(
            id = %principle.id,
            confidence = result.confidence,
            "committed derived principle"
        );
        result
    }
}
