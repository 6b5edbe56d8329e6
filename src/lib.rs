//! # jurisgraph
//!
//! A legal knowledge hypergraph with a query engine and a four-mode
//! inference engine (deductive, inductive, abductive, analogical).
//!
//! ## Architecture
//!
//! - **Hypergraph** (`graph`): typed legal nodes joined by n-ary hyperedges,
//!   with schema validation on admission
//! - **Loader** (`loader`): parses s-expression legal source texts into
//!   nodes and dependency edges
//! - **Queries** (`query`): filtered search, traversal, paths, reasoning
//!   chains, subgraph extraction, and structural similarity
//! - **Inference** (`infer`): the four reasoning modes, each deriving
//!   confidence-scored principles stacked into inference levels
//!
//! ## Library usage
//!
//! ```
//! use jurisgraph::engine::Engine;
//!
//! let mut engine = Engine::new();
//! engine
//!     .load_unit("civil", "(define offer \"a proposal intended to be binding\")")
//!     .unwrap();
//! assert!(engine.graph().contains_node("civil_offer"));
//! ```

pub mod engine;
pub mod error;
pub mod graph;
pub mod infer;
pub mod loader;
pub mod query;

pub use engine::{Engine, EngineConfig};
pub use error::{JurisError, JurisResult};
