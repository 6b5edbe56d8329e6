//! Diagnostic error types for the jurisgraph engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text. Most failure conditions in this crate are
//! *values*, not errors: an unknown node id yields an empty query result, a failed
//! inference yields a result without a principle, and a schema violation yields
//! warnings. Only construction-time violations (an edge with fewer than two
//! members, an edge referencing a node that does not exist) are hard errors.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the jurisgraph engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum JurisError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("hyperedge {edge_id} has {members} member(s), needs at least 2")]
    #[diagnostic(
        code(juris::graph::edge_too_small),
        help(
            "A hyperedge is a relationship between two or more nodes. \
             Provide at least two distinct node ids when constructing it."
        )
    )]
    EdgeTooSmall { edge_id: String, members: usize },

    #[error("hyperedge {edge_id} references unknown node {node_id}")]
    #[diagnostic(
        code(juris::graph::dangling_node),
        help(
            "Every node id in an edge's member set must already exist in the \
             store. Insert the node first, then the edge."
        )
    )]
    DanglingNode { edge_id: String, node_id: String },
}

// ---------------------------------------------------------------------------
// Loader errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("source unit has an empty branch identifier")]
    #[diagnostic(
        code(juris::load::empty_branch),
        help(
            "The branch identifier (e.g. \"civil\", \"criminal\") namespaces all \
             node ids created from a source unit and cannot be empty."
        )
    )]
    EmptyBranch,
}

/// Convenience alias for functions returning jurisgraph results.
pub type JurisResult<T> = std::result::Result<T, JurisError>;
