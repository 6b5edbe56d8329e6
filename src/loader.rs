//! Knowledge loader: symbolic-expression source records → level-0 nodes.
//!
//! A source unit is a branch identifier (e.g. "civil") plus text containing
//! top-level `(define <name> <body>)` forms with `;` line comments. Each
//! definition becomes one level-0 node namespaced by branch, and a pairwise
//! body scan produces `depends_on` hyperedges between definitions from the
//! same unit. Malformed units are logged and skipped; a batch never aborts.

use serde_json::json;

use crate::error::{JurisResult, LoadError};
use crate::graph::store::Hypergraph;
use crate::graph::{LegalHyperedge, LegalNode, NodeKind, RelationKind};

/// Configuration for the loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Definition bodies are truncated to this many characters before being
    /// stored as node content.
    pub max_body_len: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { max_body_len: 500 }
    }
}

/// One batch member: a branch identifier and its source text.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub branch: String,
    pub text: String,
}

impl SourceUnit {
    pub fn new(branch: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            text: text.into(),
        }
    }
}

/// Outcome of loading one unit or a whole batch.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub nodes_created: usize,
    pub edges_created: usize,
    /// Units (or trailing malformed forms) skipped.
    pub skipped: usize,
    /// Schema warnings surfaced while admitting nodes.
    pub warnings: Vec<String>,
}

impl LoadReport {
    fn merge(&mut self, other: LoadReport) {
        self.nodes_created += other.nodes_created;
        self.edges_created += other.edges_created;
        self.skipped += other.skipped;
        self.warnings.extend(other.warnings);
    }
}

/// Ordered keyword table deciding node kind from a definition name.
/// First matching rule wins; the fallback kind is [`NodeKind::Concept`].
pub const KIND_RULES: &[(&[&str], NodeKind)] = &[
    (&["contract", "agreement", "obligation"], NodeKind::Statute),
    (&["case", "precedent", "judgment"], NodeKind::Case),
    (&["section", "subsection", "article"], NodeKind::Section),
    (&["principle", "doctrine", "test", "rule"], NodeKind::Principle),
];

/// Decide a node kind from a definition name via [`KIND_RULES`].
pub fn infer_kind(name: &str) -> NodeKind {
    let lower = name.to_lowercase();
    for (keywords, kind) in KIND_RULES {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return *kind;
        }
    }
    NodeKind::Concept
}

// ---------------------------------------------------------------------------
// Definition extraction
// ---------------------------------------------------------------------------

/// A single extracted `(define ...)` form.
#[derive(Debug, Clone)]
struct Definition {
    name: String,
    body: String,
    /// Comment block immediately above the form, `;` markers stripped.
    context: String,
}

/// Extract all top-level named definitions from a source unit.
///
/// Scans for balanced parenthesized forms at depth 0, tracking the comment
/// block directly above each form. An unbalanced trailing form is dropped
/// (the caller counts it as a skip). Non-`define` forms are ignored.
fn extract_definitions(text: &str) -> (Vec<Definition>, usize) {
    let mut definitions = Vec::new();
    let mut dropped = 0usize;
    let bytes: Vec<char> = text.chars().collect();
    let mut i = 0usize;
    let mut pending_comment = String::new();

    while i < bytes.len() {
        match bytes[i] {
            ';' => {
                let start = i;
                while i < bytes.len() && bytes[i] != '\n' {
                    i += 1;
                }
                let line: String = bytes[start..i].iter().collect();
                let trimmed = line.trim_start_matches(';').trim();
                if !trimmed.is_empty() {
                    if !pending_comment.is_empty() {
                        pending_comment.push(' ');
                    }
                    pending_comment.push_str(trimmed);
                }
            }
            '(' => {
                match scan_form(&bytes, i) {
                    Some(end) => {
                        let form: String = bytes[i..=end].iter().collect();
                        if let Some(def) = parse_define(&form, &pending_comment) {
                            definitions.push(def);
                        }
                        pending_comment.clear();
                        i = end;
                    }
                    None => {
                        // Unbalanced to end of input; nothing more to parse.
                        dropped += 1;
                        break;
                    }
                }
            }
            '\n' => {
                // A blank line between a comment and a form breaks the block.
                if i + 1 < bytes.len() && bytes[i + 1] == '\n' {
                    pending_comment.clear();
                }
            }
            _ => {}
        }
        i += 1;
    }

    (definitions, dropped)
}

/// Find the index of the closing paren matching the one at `start`.
/// Skips `;` comments and double-quoted strings while balancing.
fn scan_form(chars: &[char], start: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut i = start;
    while i < chars.len() {
        match chars[i] {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            ';' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '"' => {
                i += 1;
                while i < chars.len() && chars[i] != '"' {
                    if chars[i] == '\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Parse a balanced top-level form into a definition, if it is one.
///
/// Handles both `(define name body...)` and the function shorthand
/// `(define (name args...) body...)`.
fn parse_define(form: &str, context: &str) -> Option<Definition> {
    let inner = form.strip_prefix('(')?.strip_suffix(')')?.trim();
    let rest = inner.strip_prefix("define")?;
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }
    let rest = rest.trim_start();

    let (name, body) = if let Some(after_paren) = rest.strip_prefix('(') {
        // (define (name args) body) — name is the first head token.
        let close = after_paren.find(')')?;
        let head = &after_paren[..close];
        let name = head.split_whitespace().next()?.to_string();
        (name, after_paren[close + 1..].trim().to_string())
    } else {
        let mut parts = rest.splitn(2, char::is_whitespace);
        let name = parts.next()?.to_string();
        let body = parts.next().unwrap_or("").trim().to_string();
        (name, body)
    };

    if name.is_empty() {
        return None;
    }

    Some(Definition {
        name,
        body,
        context: context.to_string(),
    })
}

/// Whether `body` uses `name` as a call-like or predicate-like token.
///
/// Tokens are runs of symbol characters (alphanumerics plus `-_?!*`), so
/// `offer` does not match inside `counter-offer`.
fn body_references(body: &str, name: &str) -> bool {
    let is_symbol_char = |c: char| c.is_alphanumeric() || matches!(c, '-' | '_' | '?' | '!' | '*');
    body.split(|c: char| !is_symbol_char(c))
        .any(|token| token == name)
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load one source unit into the graph.
///
/// Creates one level-0 node per definition (id `<branch>_<name>`) and one
/// `depends_on` hyperedge per referencing pair, deduplicated by edge id.
/// A unit yielding no definitions is counted as skipped, not an error.
pub fn load_unit(
    graph: &mut Hypergraph,
    branch: &str,
    text: &str,
    config: &LoaderConfig,
) -> JurisResult<LoadReport> {
    if branch.trim().is_empty() {
        return Err(LoadError::EmptyBranch.into());
    }

    let mut report = LoadReport::default();
    let (definitions, dropped) = extract_definitions(text);
    report.skipped += dropped;

    if definitions.is_empty() {
        tracing::warn!(branch, "source unit yielded no definitions, skipping");
        report.skipped += 1;
        return Ok(report);
    }

    // Pass 1: nodes.
    for def in &definitions {
        let id = format!("{branch}_{}", def.name);
        let body = truncate(&def.body, config.max_body_len);
        let mut node = LegalNode::new(&id, infer_kind(&def.name), &def.name)
            .with_content(body)
            .with_metadata("branch", json!(branch))
            .with_metadata("source_name", json!(def.name));
        if !def.context.is_empty() {
            node = node.with_metadata("context", json!(def.context));
        }

        let validation = graph.upsert_node(node);
        report.warnings.extend(validation.warnings);
        report.nodes_created += 1;
    }

    // Pass 2: dependency edges between co-loaded definitions.
    for a in &definitions {
        for b in &definitions {
            if a.name == b.name || !body_references(&a.body, &b.name) {
                continue;
            }
            let id_a = format!("{branch}_{}", a.name);
            let id_b = format!("{branch}_{}", b.name);
            let edge_id = format!("dep_{id_a}_{id_b}");
            if graph.edge(&edge_id).is_some() {
                continue;
            }
            let edge = LegalHyperedge::new(
                &edge_id,
                RelationKind::DependsOn,
                vec![id_a, id_b],
            )?
            .with_metadata("branch", json!(branch))
            .with_provenance(format!("loader:{branch}"));
            graph.insert_edge(edge)?;
            report.edges_created += 1;
        }
    }

    tracing::info!(
        branch,
        nodes = report.nodes_created,
        edges = report.edges_created,
        "loaded source unit"
    );
    Ok(report)
}

/// Load a batch of source units with partial-success semantics: a unit that
/// fails outright is logged, counted as skipped, and the batch continues.
pub fn load_batch(graph: &mut Hypergraph, units: &[SourceUnit], config: &LoaderConfig) -> LoadReport {
    let mut report = LoadReport::default();
    for unit in units {
        match load_unit(graph, &unit.branch, &unit.text, config) {
            Ok(unit_report) => report.merge(unit_report),
            Err(err) => {
                tracing::warn!(branch = %unit.branch, error = %err, "skipping source unit");
                report.skipped += 1;
            }
        }
    }
    report
}

fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        text.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CIVIL_SOURCE: &str = r#"
;; An offer must be firm and complete.
(define offer (and firm complete addressed))

;; Acceptance mirrors the offer.
(define acceptance (mirror-of offer))

(define contract-formation (and (offer) (acceptance) consideration))

(define delict-case (judgment culpa harm causation))
"#;

    #[test]
    fn extracts_definitions_with_context() {
        let (defs, dropped) = extract_definitions(CIVIL_SOURCE);
        assert_eq!(dropped, 0);
        assert_eq!(defs.len(), 4);
        assert_eq!(defs[0].name, "offer");
        assert_eq!(defs[0].context, "An offer must be firm and complete.");
        assert_eq!(defs[2].name, "contract-formation");
        assert!(defs[2].context.is_empty());
    }

    #[test]
    fn function_define_shorthand() {
        let (defs, _) = extract_definitions("(define (valid-offer? o) (firm? o))");
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "valid-offer?");
        assert_eq!(defs[0].body, "(firm? o)");
    }

    #[test]
    fn kind_rules_first_match_wins() {
        // "contract" (statute rule) precedes "rule" (principle rule) in the table.
        assert_eq!(infer_kind("contract-rule"), NodeKind::Statute);
        assert_eq!(infer_kind("delict-case"), NodeKind::Case);
        assert_eq!(infer_kind("article-7"), NodeKind::Section);
        assert_eq!(infer_kind("fairness-doctrine"), NodeKind::Principle);
        assert_eq!(infer_kind("ownership"), NodeKind::Concept);
    }

    #[test]
    fn loads_nodes_and_dependencies() {
        let mut graph = Hypergraph::new();
        let report =
            load_unit(&mut graph, "civil", CIVIL_SOURCE, &LoaderConfig::default()).unwrap();

        assert_eq!(report.nodes_created, 4);
        assert!(graph.contains_node("civil_offer"));
        assert_eq!(graph.node("civil_offer").unwrap().inference_level, 0);
        assert_eq!(
            graph.node("civil_contract-formation").unwrap().kind,
            NodeKind::Statute
        );

        // acceptance references offer; contract-formation references both.
        let edge = graph.edge("dep_civil_acceptance_civil_offer").unwrap();
        assert_eq!(edge.relation_kind, RelationKind::DependsOn);
        assert_eq!(edge.nodes, vec!["civil_acceptance", "civil_offer"]);
        assert!(graph
            .edge("dep_civil_contract-formation_civil_acceptance")
            .is_some());
        assert!(graph
            .edge("dep_civil_contract-formation_civil_offer")
            .is_some());
        assert_eq!(report.edges_created, 3);
    }

    #[test]
    fn token_matching_is_exact() {
        // "offer" must not match inside "counter-offer".
        assert!(!body_references("(reject counter-offer)", "offer"));
        assert!(body_references("(accept offer)", "offer"));
        assert!(body_references("(offer)", "offer"));
    }

    #[test]
    fn body_truncated_to_bound() {
        let long_body = "x".repeat(1000);
        let text = format!("(define long-concept {long_body})");
        let mut graph = Hypergraph::new();
        load_unit(&mut graph, "test", &text, &LoaderConfig { max_body_len: 100 }).unwrap();
        assert_eq!(graph.node("test_long-concept").unwrap().content.len(), 100);
    }

    #[test]
    fn malformed_unit_skipped_in_batch() {
        let mut graph = Hypergraph::new();
        let units = vec![
            SourceUnit::new("civil", "(define offer (firm complete))"),
            SourceUnit::new("bad", "this is not symbolic at all"),
            SourceUnit::new("", "(define orphan x)"),
            SourceUnit::new("criminal", "(define mens-rea (intent))"),
        ];
        let report = load_batch(&mut graph, &units, &LoaderConfig::default());

        assert_eq!(report.nodes_created, 2);
        assert_eq!(report.skipped, 2);
        assert!(graph.contains_node("civil_offer"));
        assert!(graph.contains_node("criminal_mens-rea"));
    }

    #[test]
    fn unbalanced_form_dropped() {
        let (defs, dropped) = extract_definitions("(define good x)\n(define broken (never closed");
        assert_eq!(defs.len(), 1);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn reloading_unit_is_idempotent() {
        let mut graph = Hypergraph::new();
        let config = LoaderConfig::default();
        load_unit(&mut graph, "civil", CIVIL_SOURCE, &config).unwrap();
        let nodes_before = graph.node_count();
        let edges_before = graph.edge_count();

        load_unit(&mut graph, "civil", CIVIL_SOURCE, &config).unwrap();
        assert_eq!(graph.node_count(), nodes_before);
        assert_eq!(graph.edge_count(), edges_before);
    }
}
