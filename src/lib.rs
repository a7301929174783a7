//! # navgraph — Waypoint Graphs and Path Sampling
//!
//! A directed graph of positioned nodes, a Dijkstra solver that reuses its
//! scratch buffers across queries, and a [`Path`] type that turns an ordered
//! node sequence into a continuous curve for agents and camera rigs.
//!
//! ## Design Principles
//!
//! 1. **Arena-owned connectivity**: nodes live in a [`Graph`] addressed by
//!    [`NodeId`]; every edge has a mirrored back-reference so removal is local
//! 2. **Queries don't mutate**: `find_shortest_path` takes `&self`; its scratch
//!    state sits behind a mutex inside the graph
//! 3. **Borrowed or owned paths**: a [`Path`] borrows graph nodes, or owns
//!    detached copies when it must outlive graph mutation
//! 4. **Failures are values**: conflicts return `false` / `None` / [`Error`],
//!    nothing panics on caller input
//!
//! ## Quick Start
//!
//! ```rust
//! use navgraph::{Graph, Vector3};
//!
//! # fn example() -> navgraph::Result<()> {
//! let mut graph = Graph::new();
//! let a = graph.create_node("a", Vector3::new(0.0, 0.0, 0.0))?;
//! let b = graph.create_node("b", Vector3::new(3.0, 0.0, 0.0))?;
//! let c = graph.create_node("c", Vector3::new(3.0, 4.0, 0.0))?;
//! graph.add_edge(a, b, None);
//! graph.add_edge(b, c, None);
//!
//! let path = graph.find_shortest_path(a, c).expect("connected");
//! assert_eq!(path.length(), 7.0);
//! let halfway = path.position_at_percentage(0.5, false);
//! assert_eq!(halfway, Some(Vector3::new(3.0, 0.5, 0.0)));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod graph;
pub mod document;

// ============================================================================
// Re-exports
// ============================================================================

pub use model::{Edge, Node, NodeId, Path, PathNode, Vector3};
pub use graph::{BuildOutcome, Graph, GraphBuilder, GraphConfig, SearchWorkspace};
pub use document::{GraphDocument, PathDocument, FORMAT_VERSION};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Duplicate node name: {0}")]
    DuplicateNode(String),

    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Duplicate edge: {from} -> {to}")]
    DuplicateEdge { from: String, to: String },

    #[error("Unsupported document version: expected {expected}, found {found}")]
    UnsupportedVersion { expected: u32, found: u32 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
