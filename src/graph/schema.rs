//! Schema validation and relationship compatibility.
//!
//! Both checks are driven by ordered static tables so coverage and ordering
//! are testable data, not logic scattered through match arms. Validation
//! produces warnings only — a failing node is still admitted to the store —
//! and the relationship table is advisory metadata, not an enforced
//! constraint on edge insertion.

use super::{LegalNode, NodeKind, RelationKind};

/// A field a node kind is required to populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Content,
    Jurisdiction,
}

impl Field {
    fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Content => "content",
            Field::Jurisdiction => "jurisdiction",
        }
    }
}

/// Required non-empty fields per node kind, checked in table order.
pub const REQUIRED_FIELDS: &[(NodeKind, &[Field])] = &[
    (NodeKind::Statute, &[Field::Name, Field::Jurisdiction]),
    (NodeKind::Case, &[Field::Name, Field::Jurisdiction]),
    (NodeKind::Precedent, &[Field::Name, Field::Jurisdiction]),
    (NodeKind::Court, &[Field::Name, Field::Jurisdiction]),
    (NodeKind::Section, &[Field::Content]),
    (NodeKind::Subsection, &[Field::Content]),
    (NodeKind::Principle, &[Field::Name, Field::Content]),
    (NodeKind::Concept, &[Field::Name]),
    (NodeKind::Party, &[Field::Name]),
    (NodeKind::Judge, &[Field::Name]),
];

/// Outcome of validating a node against its kind's required fields.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// True when no required field was missing.
    pub ok: bool,
    /// One human-readable warning per missing field.
    pub warnings: Vec<String>,
}

/// Check the required fields for the node's kind.
///
/// Missing fields are reported as warnings; the caller decides whether to
/// reject. Kinds absent from [`REQUIRED_FIELDS`] validate trivially.
pub fn validate(node: &LegalNode) -> ValidationReport {
    let mut warnings = Vec::new();

    if let Some((_, fields)) = REQUIRED_FIELDS.iter().find(|(kind, _)| *kind == node.kind) {
        for field in fields.iter() {
            let value = match field {
                Field::Name => &node.name,
                Field::Content => &node.content,
                Field::Jurisdiction => &node.jurisdiction,
            };
            if value.trim().is_empty() {
                warnings.push(format!(
                    "{} node '{}' is missing required field '{}'",
                    node.kind,
                    node.id,
                    field.as_str()
                ));
            }
        }
    }

    ValidationReport {
        ok: warnings.is_empty(),
        warnings,
    }
}

/// Relationship kinds permitted between a (source kind, target kind) pair.
///
/// Directional: `(Case, Statute)` entries do not imply `(Statute, Case)`.
pub const RELATIONSHIP_RULES: &[(NodeKind, NodeKind, &[RelationKind])] = &[
    (
        NodeKind::Case,
        NodeKind::Case,
        &[
            RelationKind::Cites,
            RelationKind::Follows,
            RelationKind::Distinguishes,
            RelationKind::Overrules,
            RelationKind::ConflictsWith,
        ],
    ),
    (
        NodeKind::Case,
        NodeKind::Statute,
        &[
            RelationKind::Cites,
            RelationKind::Interprets,
            RelationKind::AppliesTo,
        ],
    ),
    (
        NodeKind::Statute,
        NodeKind::Statute,
        &[
            RelationKind::Amends,
            RelationKind::Repeals,
            RelationKind::Cites,
            RelationKind::ConflictsWith,
        ],
    ),
    (
        NodeKind::Section,
        NodeKind::Section,
        &[RelationKind::DependsOn, RelationKind::Cites],
    ),
    (
        NodeKind::Principle,
        NodeKind::Case,
        &[RelationKind::AppliesTo, RelationKind::Supports],
    ),
    (
        NodeKind::Principle,
        NodeKind::Principle,
        &[
            RelationKind::Supports,
            RelationKind::ConflictsWith,
            RelationKind::Generalizes,
            RelationKind::DependsOn,
            RelationKind::InfersFrom,
        ],
    ),
    (
        NodeKind::Concept,
        NodeKind::Concept,
        &[RelationKind::DependsOn, RelationKind::Supports],
    ),
];

/// Whether the static compatibility table permits `relation` between the two
/// kinds. Pairs without a table entry are not permitted.
pub fn is_valid_relationship(source: NodeKind, target: NodeKind, relation: RelationKind) -> bool {
    RELATIONSHIP_RULES
        .iter()
        .find(|(s, t, _)| *s == source && *t == target)
        .is_some_and(|(_, _, relations)| relations.contains(&relation))
}
