//! The fixed legal pattern library and domain family groups.
//!
//! Both tables are ordered static data, evaluated top-to-bottom: when two
//! patterns would match equally well, the earlier entry wins. That ordering
//! is deliberate and stable; tests pin it.

use crate::graph::LegalNode;

use super::DomainTiers;

/// A recognizable legal pattern: keywords to match and the principle it
/// generalizes to.
#[derive(Debug, Clone, Copy)]
pub struct LegalPattern {
    pub key: &'static str,
    /// Name of the principle this pattern generalizes to.
    pub principle: &'static str,
    /// Statement of the principle, stored as derived-node content.
    pub description: &'static str,
    pub keywords: &'static [&'static str],
}

/// The pattern library, in precedence order.
pub const PATTERNS: &[LegalPattern] = &[
    LegalPattern {
        key: "reasonable-person",
        principle: "Reasonable Person Standard",
        description: "Conduct is measured against what a reasonable person \
                      would have done in the circumstances.",
        keywords: &["reasonable", "prudent", "ordinary care", "standard of care"],
    },
    LegalPattern {
        key: "mental-culpability",
        principle: "Mental Culpability Requirement",
        description: "Liability requires a blameworthy state of mind, whether \
                      intention or negligence, proportionate to the wrong done.",
        keywords: &["intent", "intention", "mens rea", "negligen", "culpa", "fault"],
    },
    LegalPattern {
        key: "contract-formation",
        principle: "Contract Formation Doctrine",
        description: "A binding agreement requires offer, acceptance, consideration \
                      and an intention to create legal relations.",
        keywords: &["offer", "acceptance", "consideration", "agreement", "contract"],
    },
    LegalPattern {
        key: "procedural-fairness",
        principle: "Procedural Fairness Doctrine",
        description: "Decisions affecting rights require notice, a hearing and an \
                      unbiased decision-maker.",
        keywords: &["hearing", "notice", "fair", "procedur", "audi alteram"],
    },
];

/// The fallback hypothesis when no library pattern qualifies.
pub const GENERIC_PATTERN: LegalPattern = LegalPattern {
    key: "generic",
    principle: "General Legal Principle",
    description: "A common underlying legal principle connects the source materials.",
    keywords: &[],
};

/// Whether a pattern matches a node: any keyword occurs (literally,
/// case-insensitively) in the node's name or content.
pub fn pattern_matches(pattern: &LegalPattern, node: &LegalNode) -> bool {
    let text = format!("{} {}", node.name, node.content).to_lowercase();
    pattern.keywords.iter().any(|kw| text.contains(kw))
}

// ---------------------------------------------------------------------------
// Domain families
// ---------------------------------------------------------------------------

/// Domain family groups for analogical transfer.
pub const DOMAIN_FAMILIES: &[(&str, &[&str])] = &[
    ("civil", &["civil", "contract", "delict", "property"]),
    ("public", &["constitutional", "administrative", "criminal"]),
    (
        "specialized",
        &["labour", "environmental", "construction", "international"],
    ),
];

/// The family a domain belongs to, if it is a known domain.
pub fn family_of(domain: &str) -> Option<&'static str> {
    let needle = domain.to_lowercase();
    DOMAIN_FAMILIES
        .iter()
        .find(|(_, members)| members.contains(&needle.as_str()))
        .map(|(family, _)| *family)
}

/// Whether two distinct families are adjacent. Specialized domains straddle
/// private and public law; civil and public are not adjacent.
fn families_adjacent(a: &str, b: &str) -> bool {
    matches!(
        (a, b),
        ("specialized", "civil")
            | ("civil", "specialized")
            | ("specialized", "public")
            | ("public", "specialized")
    )
}

/// Tiered domain similarity used by analogical inference.
pub fn domain_similarity(source: &str, target: &str, tiers: &DomainTiers) -> f64 {
    let source = source.to_lowercase();
    let target = target.to_lowercase();
    if source == target && family_of(&source).is_some() {
        return tiers.same;
    }
    match (family_of(&source), family_of(&target)) {
        (Some(fa), Some(fb)) if fa == fb => {
            if fa == "civil" {
                tiers.same_family_civil
            } else {
                tiers.same_family_other
            }
        }
        (Some(fa), Some(fb)) if families_adjacent(fa, fb) => tiers.adjacent_family,
        _ => tiers.unrelated,
    }
}
