//! The four reasoning procedures.
//!
//! Each procedure validates its preconditions, derives at most one new node,
//! and returns the node plus its supporting edges without touching the store.
//! Derived-node levels respect monotonicity: a derived node sits strictly
//! above the lowest of its sources, whatever `target_level` the caller asks
//! for.

use std::hash::{Hash, Hasher};

use serde_json::json;

use crate::graph::{InferenceType, LegalHyperedge, LegalNode, NodeKind, RelationKind};

use super::patterns::{self, GENERIC_PATTERN, LegalPattern, PATTERNS};
use super::{InferenceConfig, InferenceResult};

/// Deterministic short id for a derived node.
fn derived_id(mode: &str, sources: &[&LegalNode]) -> String {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for source in sources {
        source.id.hash(&mut hasher);
    }
    format!("inf_{mode}_{:08x}", hasher.finish() as u32)
}

/// Level for a derived node: at least `target_level`, and strictly above the
/// lowest source level.
fn derived_level(target_level: u8, sources: &[&LegalNode]) -> u8 {
    let min_source = sources
        .iter()
        .map(|s| s.inference_level)
        .min()
        .unwrap_or(0);
    target_level.max(min_source.saturating_add(1))
}

// ---------------------------------------------------------------------------
// Deductive
// ---------------------------------------------------------------------------

/// Modus ponens: apply a general principle (`sources[0]`) to a specific case
/// (`sources[1]`). Confidence is the weaker of the two inputs.
pub fn deduce(
    config: &InferenceConfig,
    sources: &[&LegalNode],
    target_level: u8,
) -> InferenceResult {
    let _ = config;
    if sources.len() < 2 {
        return InferenceResult::failed(
            "deductive inference requires a general principle and a specific case",
        );
    }
    let general = sources[0];
    let specific = sources[1];
    let pair = [general, specific];

    let confidence = general.confidence.min(specific.confidence);
    let level = derived_level(target_level, &pair);
    let id = derived_id("deductive", &pair);

    let jurisdiction = if general.jurisdiction.is_empty() {
        specific.jurisdiction.clone()
    } else {
        general.jurisdiction.clone()
    };

    let node = LegalNode::new(&id, NodeKind::Principle, format!("{} applied to {}", general.name, specific.name))
        .with_content(format!(
            "By modus ponens, the general principle '{}' governs the specific case '{}'.",
            general.name, specific.name
        ))
        .with_jurisdiction(jurisdiction)
        .with_inference(level, InferenceType::Deductive)
        .with_confidence(confidence)
        .with_metadata("general", json!(general.id))
        .with_metadata("specific", json!(specific.id));

    let mut edges = Vec::new();
    match LegalHyperedge::new(
        format!("{id}_from"),
        RelationKind::InfersFrom,
        vec![id.clone(), general.id.clone(), specific.id.clone()],
    ) {
        Ok(edge) => edges.push(edge.with_confidence(confidence)),
        Err(err) => return InferenceResult::failed(format!("degenerate sources: {err}")),
    }
    if let Ok(edge) = LegalHyperedge::new(
        format!("{id}_applies"),
        RelationKind::AppliesTo,
        vec![id.clone(), specific.id.clone()],
    ) {
        edges.push(edge.with_confidence(confidence));
    }

    tracing::debug!(id = %id, confidence, "deductive inference succeeded");
    InferenceResult {
        principle: Some(node),
        confidence,
        inference_type: Some(InferenceType::Deductive),
        supporting_nodes: vec![general.id.clone(), specific.id.clone()],
        supporting_edges: edges,
        explanation: format!(
            "Applied '{}' (confidence {:.2}) to '{}' (confidence {:.2}); conclusion carries the weaker confidence {:.2}.",
            general.name, general.confidence, specific.name, specific.confidence, confidence
        ),
    }
}

// ---------------------------------------------------------------------------
// Inductive
// ---------------------------------------------------------------------------

/// Generalize a shared pattern across specific facts into a principle.
///
/// The first library pattern matching at least `pattern_share` of the
/// sources wins; with no qualifying pattern the generic principle is used.
/// Confidence grows with the source count: `min(cap, n / (n + 1))`.
pub fn induce(
    config: &InferenceConfig,
    sources: &[&LegalNode],
    target_level: u8,
) -> InferenceResult {
    if sources.len() < 2 {
        return InferenceResult::failed("inductive inference requires at least two source facts");
    }

    let n = sources.len();
    let mut selected: Option<(&LegalPattern, usize)> = None;
    for pattern in PATTERNS {
        let matched = sources
            .iter()
            .filter(|s| patterns::pattern_matches(pattern, s))
            .count();
        if matched as f64 / n as f64 >= config.pattern_share {
            selected = Some((pattern, matched));
            break;
        }
    }
    let (pattern, matched) = selected.unwrap_or((&GENERIC_PATTERN, n));

    let confidence = config.inductive_cap.min(n as f64 / (n as f64 + 1.0));
    let level = derived_level(target_level, sources);
    let id = derived_id("inductive", sources);

    let node = LegalNode::new(&id, NodeKind::Principle, pattern.principle)
        .with_content(pattern.description)
        .with_inference(level, InferenceType::Inductive)
        .with_confidence(confidence)
        .with_metadata("pattern", json!(pattern.key))
        .with_metadata("source_count", json!(n));

    let mut members = vec![id.clone()];
    members.extend(sources.iter().map(|s| s.id.clone()));
    let edge = match LegalHyperedge::new(format!("{id}_gen"), RelationKind::Generalizes, members) {
        Ok(edge) => edge.with_confidence(confidence),
        Err(err) => return InferenceResult::failed(format!("degenerate sources: {err}")),
    };

    tracing::debug!(id = %id, pattern = pattern.key, confidence, "inductive inference succeeded");
    InferenceResult {
        principle: Some(node),
        confidence,
        inference_type: Some(InferenceType::Inductive),
        supporting_nodes: sources.iter().map(|s| s.id.clone()).collect(),
        supporting_edges: vec![edge],
        explanation: format!(
            "Generalized the '{}' pattern from {matched} of {n} source facts (confidence {confidence:.2}).",
            pattern.key
        ),
    }
}

// ---------------------------------------------------------------------------
// Abductive
// ---------------------------------------------------------------------------

/// Hypothesize the best explanation for a set of observations.
///
/// Every library pattern and the generic fallback are scored as
/// `0.5·explanatory_power + 0.3·coherence + 0.2·simplicity` (weights from
/// config); the highest score wins, earlier table entries winning ties.
/// Confidence is the score with the abductive discount applied.
pub fn abduce(
    config: &InferenceConfig,
    observations: &[&LegalNode],
    target_level: u8,
) -> InferenceResult {
    if observations.len() < 2 {
        return InferenceResult::failed("abductive inference requires at least two observations");
    }

    let n = observations.len();
    let score_of = |pattern: &LegalPattern, coherence: f64, power: f64| -> f64 {
        config.explanatory_weight * power
            + config.coherence_weight * coherence
            + config.simplicity_weight * config.simplicity(pattern.description.len())
    };

    let mut best: Option<(&LegalPattern, f64, f64)> = None;
    for pattern in PATTERNS {
        let matched = observations
            .iter()
            .filter(|o| patterns::pattern_matches(pattern, o))
            .count();
        let power = matched as f64 / n as f64;
        let score = score_of(pattern, config.pattern_coherence, power);
        if best.is_none_or(|(_, best_score, _)| score > best_score) {
            best = Some((pattern, score, power));
        }
    }
    // The generic hypothesis explains everything, weakly.
    let generic_score = score_of(&GENERIC_PATTERN, config.generic_coherence, 1.0);
    if best.is_none_or(|(_, best_score, _)| generic_score > best_score) {
        best = Some((&GENERIC_PATTERN, generic_score, 1.0));
    }
    let (pattern, score, power) = best.unwrap_or((&GENERIC_PATTERN, generic_score, 1.0));

    let confidence = score * config.abductive_discount;
    let level = derived_level(target_level, observations);
    let id = derived_id("abductive", observations);

    let node = LegalNode::new(&id, NodeKind::Principle, pattern.principle)
        .with_content(pattern.description)
        .with_inference(level, InferenceType::Abductive)
        .with_confidence(confidence)
        .with_metadata("pattern", json!(pattern.key))
        .with_metadata("explanatory_power", json!(power))
        .with_metadata("score", json!(score));

    let mut members = vec![id.clone()];
    members.extend(observations.iter().map(|o| o.id.clone()));
    let mut edges = Vec::new();
    match LegalHyperedge::new(format!("{id}_from"), RelationKind::InfersFrom, members.clone()) {
        Ok(edge) => edges.push(edge.with_confidence(confidence)),
        Err(err) => return InferenceResult::failed(format!("degenerate observations: {err}")),
    }
    if let Ok(edge) = LegalHyperedge::new(format!("{id}_supports"), RelationKind::Supports, members)
    {
        edges.push(edge.with_confidence(confidence));
    }

    tracing::debug!(id = %id, pattern = pattern.key, score, confidence, "abductive inference succeeded");
    InferenceResult {
        principle: Some(node),
        confidence,
        inference_type: Some(InferenceType::Abductive),
        supporting_nodes: observations.iter().map(|o| o.id.clone()).collect(),
        supporting_edges: edges,
        explanation: format!(
            "Hypothesis '{}' explains {:.0}% of {n} observations (score {score:.2}, confidence {confidence:.2}).",
            pattern.key,
            power * 100.0
        ),
    }
}

// ---------------------------------------------------------------------------
// Analogical
// ---------------------------------------------------------------------------

/// The domain a source principle belongs to, for similarity lookup.
///
/// Checks `properties.domain`, then `metadata.branch`, then scans the node
/// text for a known domain name.
fn source_domain(node: &LegalNode) -> Option<String> {
    if let Some(domain) = node.properties.get("domain").and_then(|v| v.as_str()) {
        return Some(domain.to_lowercase());
    }
    if let Some(branch) = node.metadata.get("branch").and_then(|v| v.as_str()) {
        if patterns::family_of(branch).is_some() {
            return Some(branch.to_lowercase());
        }
    }
    let text = format!("{} {}", node.name, node.content).to_lowercase();
    patterns::DOMAIN_FAMILIES
        .iter()
        .flat_map(|(_, members)| members.iter())
        .find(|domain| text.contains(*domain))
        .map(|domain| domain.to_string())
}

/// Transfer a principle to a target domain, if the domains are similar
/// enough. Confidence is `similarity · conf(source) · discount`; below the
/// threshold the transfer fails.
pub fn analogize(
    config: &InferenceConfig,
    source: &LegalNode,
    target_domain: &str,
    target_level: u8,
) -> InferenceResult {
    let domain = source_domain(source);
    let similarity = match &domain {
        Some(domain) => patterns::domain_similarity(domain, target_domain, &config.domain_tiers),
        None => config.domain_tiers.unrelated,
    };

    if similarity < config.analogical_threshold {
        tracing::debug!(
            source = %source.id,
            target_domain,
            similarity,
            "analogical inference rejected"
        );
        return InferenceResult::failed(format!(
            "domains '{}' and '{target_domain}' are too dissimilar ({similarity:.2} < {:.2})",
            domain.as_deref().unwrap_or("unknown"),
            config.analogical_threshold
        ));
    }

    let confidence = similarity * source.confidence * config.analogical_discount;
    let pair = [source];
    let level = derived_level(target_level, &pair);
    let id = derived_id(&format!("analogical_{target_domain}"), &pair);

    let node = LegalNode::new(&id, NodeKind::Principle, format!("{} ({target_domain} analogue)", source.name))
        .with_content(format!(
            "By analogy with {} law: {}",
            domain.as_deref().unwrap_or("the source"),
            source.content
        ))
        .with_jurisdiction(source.jurisdiction.clone())
        .with_inference(level, InferenceType::Analogical)
        .with_confidence(confidence)
        .with_property("domain", json!(target_domain))
        .with_metadata("source_domain", json!(domain))
        .with_metadata("similarity", json!(similarity));

    let edge = match LegalHyperedge::new(
        format!("{id}_from"),
        RelationKind::InfersFrom,
        vec![id.clone(), source.id.clone()],
    ) {
        Ok(edge) => edge.with_confidence(confidence),
        Err(err) => return InferenceResult::failed(format!("degenerate source: {err}")),
    };

    tracing::debug!(id = %id, similarity, confidence, "analogical inference succeeded");
    InferenceResult {
        principle: Some(node),
        confidence,
        inference_type: Some(InferenceType::Analogical),
        supporting_nodes: vec![source.id.clone()],
        supporting_edges: vec![edge],
        explanation: format!(
            "Transferred '{}' to {target_domain} law (similarity {similarity:.2}, confidence {confidence:.2}).",
            source.name
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(id: &str, content: &str) -> LegalNode {
        LegalNode::new(id, NodeKind::Case, id)
            .with_jurisdiction("za")
            .with_content(content)
    }

    fn config() -> InferenceConfig {
        InferenceConfig::default()
    }

    #[test]
    fn deductive_takes_weaker_confidence() {
        let general = LegalNode::new("g", NodeKind::Principle, "pacta sunt servanda")
            .with_content("agreements must be honoured")
            .with_confidence(0.95);
        let specific = fact("s", "a breached the sale agreement");

        let result = deduce(&config(), &[&general, &specific], 1);
        assert!(result.succeeded());
        assert!((result.confidence - 0.95).abs() < 1e-12);

        let node = result.principle.unwrap();
        assert_eq!(node.inference_level, 1);
        assert_eq!(node.inference_type, Some(InferenceType::Deductive));
        // The infers_from hyperedge links all three nodes at once.
        assert_eq!(result.supporting_edges[0].nodes.len(), 3);
        assert_eq!(
            result.supporting_edges[0].relation_kind,
            RelationKind::InfersFrom
        );
    }

    #[test]
    fn deductive_needs_two_sources() {
        let lone = fact("s", "x");
        let result = deduce(&config(), &[&lone], 1);
        assert!(!result.succeeded());
    }

    #[test]
    fn deductive_level_sits_above_sources() {
        let general = LegalNode::new("g", NodeKind::Principle, "p")
            .with_inference(1, InferenceType::Inductive);
        let specific = LegalNode::new("s", NodeKind::Principle, "q")
            .with_inference(1, InferenceType::Inductive);

        // target_level 1 is below min(source)+1, so the level is bumped to 2.
        let result = deduce(&config(), &[&general, &specific], 1);
        assert_eq!(result.principle.unwrap().inference_level, 2);
    }

    #[test]
    fn inductive_confidence_grows_with_sources() {
        let facts: Vec<LegalNode> = (0..4)
            .map(|i| fact(&format!("f{i}"), "an offer and acceptance formed the contract"))
            .collect();
        let refs: Vec<&LegalNode> = facts.iter().collect();

        let result = induce(&config(), &refs, 1);
        assert!(result.succeeded());
        // n = 4: min(0.95, 4/5) = 0.8.
        assert!((result.confidence - 0.8).abs() < 1e-12);

        let node = result.principle.unwrap();
        assert_eq!(node.name, "Contract Formation Doctrine");
        assert_eq!(node.metadata.get("pattern"), Some(&json!("contract-formation")));
        // One generalizes edge spans the principle and all four sources.
        assert_eq!(result.supporting_edges.len(), 1);
        assert_eq!(result.supporting_edges[0].nodes.len(), 5);
    }

    #[test]
    fn inductive_confidence_is_capped() {
        let facts: Vec<LegalNode> = (0..30)
            .map(|i| fact(&format!("f{i}"), "contract offer"))
            .collect();
        let refs: Vec<&LegalNode> = facts.iter().collect();

        let result = induce(&config(), &refs, 1);
        assert!((result.confidence - 0.95).abs() < 1e-12);
    }

    #[test]
    fn inductive_falls_back_to_generic() {
        let a = fact("a", "zoning bylaw dispute");
        let b = fact("b", "water rights claim");
        let result = induce(&config(), &[&a, &b], 1);
        assert!(result.succeeded());
        assert_eq!(
            result.principle.unwrap().metadata.get("pattern"),
            Some(&json!("generic"))
        );
    }

    #[test]
    fn inductive_pattern_precedence() {
        // Both reasonable-person and mental-culpability match every source;
        // the earlier table entry must win.
        let a = fact("a", "a reasonable person would have foreseen the negligence");
        let b = fact("b", "reasonable foresight and intent");
        let result = induce(&config(), &[&a, &b], 1);
        assert_eq!(
            result.principle.unwrap().metadata.get("pattern"),
            Some(&json!("reasonable-person"))
        );
    }

    #[test]
    fn abductive_scores_and_discounts() {
        let observations: Vec<LegalNode> = (0..3)
            .map(|i| fact(&format!("o{i}"), "offer and acceptance with consideration"))
            .collect();
        let refs: Vec<&LegalNode> = observations.iter().collect();

        let result = abduce(&config(), &refs, 1);
        assert!(result.succeeded());

        // contract-formation: power 1.0, coherence 0.8, description over
        // 100 chars → simplicity 0.7: score = 0.5 + 0.24 + 0.14 = 0.88.
        let node = result.principle.as_ref().unwrap();
        assert_eq!(node.metadata.get("pattern"), Some(&json!("contract-formation")));
        let score = node.metadata.get("score").unwrap().as_f64().unwrap();
        assert!((score - 0.88).abs() < 1e-9);
        assert!((result.confidence - 0.88 * 0.7).abs() < 1e-9);
    }

    #[test]
    fn abductive_prefers_generic_over_unmatched_patterns() {
        let a = fact("a", "mineral extraction levy");
        let b = fact("b", "border tariff schedule");
        let result = abduce(&config(), &[&a, &b], 1);
        assert_eq!(
            result.principle.unwrap().metadata.get("pattern"),
            Some(&json!("generic"))
        );
    }

    #[test]
    fn abductive_needs_two_observations() {
        let lone = fact("a", "x");
        assert!(!abduce(&config(), &[&lone], 1).succeeded());
    }

    #[test]
    fn analogical_rejects_dissimilar_domains() {
        let source = LegalNode::new("p", NodeKind::Principle, "caveat emptor")
            .with_content("the buyer inspects")
            .with_property("domain", json!("contract"));

        // contract (civil family) → criminal (public family): 0.4 < 0.6.
        let result = analogize(&config(), &source, "criminal", 1);
        assert!(!result.succeeded());
        assert!(result.explanation.contains("dissimilar"));
    }

    #[test]
    fn analogical_transfers_within_family() {
        let source = LegalNode::new("p", NodeKind::Principle, "caveat emptor")
            .with_content("the buyer inspects")
            .with_confidence(0.9)
            .with_property("domain", json!("contract"));

        let result = analogize(&config(), &source, "delict", 1);
        assert!(result.succeeded());
        // 0.8 similarity · 0.9 confidence · 0.9 discount.
        assert!((result.confidence - 0.8 * 0.9 * 0.9).abs() < 1e-9);

        let node = result.principle.unwrap();
        assert_eq!(node.properties.get("domain"), Some(&json!("delict")));
        assert_eq!(node.inference_type, Some(InferenceType::Analogical));
    }

    #[test]
    fn analogical_domain_from_branch_metadata() {
        let source = LegalNode::new("p", NodeKind::Principle, "strict liability")
            .with_metadata("branch", json!("delict"));
        let result = analogize(&config(), &source, "property", 1);
        assert!(result.succeeded());
    }

    #[test]
    fn analogical_unknown_domain_rejected() {
        let source = LegalNode::new("p", NodeKind::Principle, "some maxim");
        let result = analogize(&config(), &source, "contract", 1);
        assert!(!result.succeeded());
    }
}
