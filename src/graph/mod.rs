//! Legal knowledge hypergraph: data model, store, and schema.
//!
//! The graph stores [`LegalNode`]s (statutes, cases, principles, concepts, ...)
//! connected by [`LegalHyperedge`]s — true hyperedges linking two *or more*
//! nodes at once, not just pairwise edges.
//!
//! - **Store** ([`store::Hypergraph`]): nodes, edges, and a node → incident-edges index
//! - **Schema** ([`schema`]): required-field validation and relationship compatibility

pub mod schema;
pub mod store;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Classification of a legal entity in the knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Statute,
    Section,
    Subsection,
    Case,
    Precedent,
    Principle,
    Concept,
    Party,
    Court,
    Judge,
}

impl NodeKind {
    /// Stable lowercase name, used in stats keys and query metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Statute => "statute",
            NodeKind::Section => "section",
            NodeKind::Subsection => "subsection",
            NodeKind::Case => "case",
            NodeKind::Precedent => "precedent",
            NodeKind::Principle => "principle",
            NodeKind::Concept => "concept",
            NodeKind::Party => "party",
            NodeKind::Court => "court",
            NodeKind::Judge => "judge",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of relationship a hyperedge asserts between its member nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Cites,
    Interprets,
    Overrules,
    Follows,
    Distinguishes,
    Amends,
    Repeals,
    AppliesTo,
    ConflictsWith,
    Supports,
    DependsOn,
    InfersFrom,
    Generalizes,
}

impl RelationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::Cites => "cites",
            RelationKind::Interprets => "interprets",
            RelationKind::Overrules => "overrules",
            RelationKind::Follows => "follows",
            RelationKind::Distinguishes => "distinguishes",
            RelationKind::Amends => "amends",
            RelationKind::Repeals => "repeals",
            RelationKind::AppliesTo => "applies_to",
            RelationKind::ConflictsWith => "conflicts_with",
            RelationKind::Supports => "supports",
            RelationKind::DependsOn => "depends_on",
            RelationKind::InfersFrom => "infers_from",
            RelationKind::Generalizes => "generalizes",
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The reasoning mode that produced a derived node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceType {
    Deductive,
    Inductive,
    Abductive,
    Analogical,
}

impl InferenceType {
    pub fn as_str(self) -> &'static str {
        match self {
            InferenceType::Deductive => "deductive",
            InferenceType::Inductive => "inductive",
            InferenceType::Abductive => "abductive",
            InferenceType::Analogical => "analogical",
        }
    }
}

impl std::fmt::Display for InferenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A knowledge-base entity: one statute, case, principle, concept, etc.
///
/// Level-0 nodes are ingested facts with full confidence; level-1 and level-2
/// nodes are created by the inference engine and carry the reasoning mode and
/// computed confidence that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalNode {
    /// Unique, stable key within a store instance.
    pub id: String,
    pub kind: NodeKind,
    pub name: String,
    /// Free text: statute body, case summary, principle statement.
    pub content: String,
    pub jurisdiction: String,
    /// Open provenance map (branch, source text, derivation notes).
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// Open domain-attribute map (e.g. `domain`, party roles).
    pub properties: BTreeMap<String, serde_json::Value>,
    /// 0 = ingested fact, 1 = first-order principle, 2 = meta-principle.
    pub inference_level: u8,
    /// Reasoning mode for derived nodes; `None` iff `inference_level == 0`.
    pub inference_type: Option<InferenceType>,
    /// Confidence in [0.0, 1.0]. Defaults to 1.0 for ground-truth nodes.
    pub confidence: f64,
}

impl LegalNode {
    /// Create a level-0 node with full confidence and empty text fields.
    pub fn new(id: impl Into<String>, kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            content: String::new(),
            jurisdiction: String::new(),
            metadata: BTreeMap::new(),
            properties: BTreeMap::new(),
            inference_level: 0,
            inference_type: None,
            confidence: 1.0,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_jurisdiction(mut self, jurisdiction: impl Into<String>) -> Self {
        self.jurisdiction = jurisdiction.into();
        self
    }

    /// Set the confidence score, clamped to [0.0, 1.0].
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Mark this node as derived by the given reasoning mode at the given level.
    pub fn with_inference(mut self, level: u8, inference_type: InferenceType) -> Self {
        self.inference_level = level.max(1);
        self.inference_type = Some(inference_type);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}

/// A relationship connecting two or more nodes.
///
/// The member list is ordered and deduplicated. For directed-ish relations
/// (`depends_on`, `infers_from`) the first member is the semantic source: the
/// depender, or the derived node the edge supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalHyperedge {
    pub id: String,
    pub relation_kind: RelationKind,
    /// Member node ids, ordered, each of which must exist in the store.
    pub nodes: Vec<String>,
    pub weight: f64,
    /// Confidence in [0.0, 1.0].
    pub confidence: f64,
    pub metadata: BTreeMap<String, serde_json::Value>,
    pub provenance: Option<String>,
}

impl LegalHyperedge {
    /// Create a hyperedge over the given member ids.
    ///
    /// Duplicate ids are removed (first occurrence wins). Fewer than two
    /// distinct members is a construction-time error, never a stored state.
    pub fn new(
        id: impl Into<String>,
        relation_kind: RelationKind,
        nodes: Vec<String>,
    ) -> Result<Self, GraphError> {
        let id = id.into();
        let mut members: Vec<String> = Vec::with_capacity(nodes.len());
        for node in nodes {
            if !members.contains(&node) {
                members.push(node);
            }
        }
        if members.len() < 2 {
            return Err(GraphError::EdgeTooSmall {
                edge_id: id,
                members: members.len(),
            });
        }
        Ok(Self {
            id,
            relation_kind,
            nodes: members,
            weight: 1.0,
            confidence: 1.0,
            metadata: BTreeMap::new(),
            provenance: None,
        })
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Set the confidence score, clamped to [0.0, 1.0].
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn with_provenance(mut self, provenance: impl Into<String>) -> Self {
        self.provenance = Some(provenance.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Whether the given node is a member of this edge.
    pub fn contains(&self, node_id: &str) -> bool {
        self.nodes.iter().any(|n| n == node_id)
    }

    /// The semantic source member (first in the ordered member list).
    pub fn source(&self) -> &str {
        &self.nodes[0]
    }
}
