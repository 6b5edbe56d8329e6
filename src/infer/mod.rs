//! Symbolic inference: four calibrated reasoning procedures.
//!
//! Deductive (apply a general rule to a case), inductive (generalize from
//! examples), abductive (hypothesize the best explanation), and analogical
//! (transfer a rule across domains by similarity). Procedures are pure: they
//! read source nodes and return an [`InferenceResult`] carrying the derived
//! node and its supporting edges; the caller commits those to the store.
//!
//! A result without a principle is a normal outcome (insufficient inputs,
//! no matching pattern, below-threshold similarity), never an error.

pub mod engine;
pub mod hierarchy;
pub mod patterns;

use serde::Serialize;

use crate::graph::{InferenceType, LegalHyperedge, LegalNode};

pub use engine::{abduce, analogize, deduce, induce};
pub use hierarchy::{build_hierarchy, inference_chain};

/// Outcome of one reasoning procedure.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceResult {
    /// The derived node, absent when a precondition failed.
    pub principle: Option<LegalNode>,
    pub confidence: f64,
    pub inference_type: Option<InferenceType>,
    /// Ids of the source nodes the derivation rests on.
    pub supporting_nodes: Vec<String>,
    /// Edges linking the derived node back to its sources, ready to insert.
    pub supporting_edges: Vec<LegalHyperedge>,
    /// Human-readable account of what happened, success or failure.
    pub explanation: String,
}

impl InferenceResult {
    /// A precondition-failure result: no principle, zero confidence.
    pub fn failed(explanation: impl Into<String>) -> Self {
        Self {
            principle: None,
            confidence: 0.0,
            inference_type: None,
            supporting_nodes: Vec::new(),
            supporting_edges: Vec::new(),
            explanation: explanation.into(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.principle.is_some()
    }
}

/// Domain-similarity tiers for analogical inference.
#[derive(Debug, Clone)]
pub struct DomainTiers {
    /// Identical domains.
    pub same: f64,
    /// Two distinct domains within the civil family.
    pub same_family_civil: f64,
    /// Two distinct domains within another family.
    pub same_family_other: f64,
    /// Domains in adjacent families (specialized borders civil and public).
    pub adjacent_family: f64,
    /// Everything else, including unknown domains.
    pub unrelated: f64,
}

impl Default for DomainTiers {
    fn default() -> Self {
        Self {
            same: 1.0,
            same_family_civil: 0.8,
            same_family_other: 0.7,
            adjacent_family: 0.6,
            unrelated: 0.4,
        }
    }
}

/// Tunable constants for the reasoning procedures. Defaults reproduce the
/// calibrated production behavior; tests override individual fields.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Upper bound on inductive confidence (`min(cap, n/(n+1))`).
    pub inductive_cap: f64,
    /// Fraction of sources a pattern must match to support a generalization.
    pub pattern_share: f64,
    /// Abductive score weight for explanatory power.
    pub explanatory_weight: f64,
    /// Abductive score weight for coherence.
    pub coherence_weight: f64,
    /// Abductive score weight for simplicity.
    pub simplicity_weight: f64,
    /// Coherence assigned to a library pattern hypothesis.
    pub pattern_coherence: f64,
    /// Coherence assigned to the generic fallback hypothesis.
    pub generic_coherence: f64,
    /// Discount applied to abductive confidence (hypotheses stay tentative).
    pub abductive_discount: f64,
    /// Minimum domain similarity for an analogical transfer.
    pub analogical_threshold: f64,
    /// Discount applied to analogical confidence.
    pub analogical_discount: f64,
    pub domain_tiers: DomainTiers,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            inductive_cap: 0.95,
            pattern_share: 0.5,
            explanatory_weight: 0.5,
            coherence_weight: 0.3,
            simplicity_weight: 0.2,
            pattern_coherence: 0.8,
            generic_coherence: 0.6,
            abductive_discount: 0.7,
            analogical_threshold: 0.6,
            analogical_discount: 0.9,
            domain_tiers: DomainTiers::default(),
        }
    }
}

impl InferenceConfig {
    /// Simplicity heuristic, tiered by hypothesis description length.
    pub fn simplicity(&self, description_len: usize) -> f64 {
        if description_len < 100 {
            0.9
        } else if description_len < 200 {
            0.7
        } else {
            0.5
        }
    }
}
