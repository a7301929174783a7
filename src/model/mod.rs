//! # Navigation Model
//!
//! Plain value types shared by the graph, the solver and the persistence layer.
//!
//! Design rule: nothing in here mutates graph connectivity. Edge and
//! back-reference bookkeeping is owned by [`Graph`](crate::Graph); these types
//! only expose read access to it.

pub mod vector;
pub mod node;
pub mod path;

pub use vector::Vector3;
pub use node::{Node, NodeId, Edge};
pub use path::{Path, PathNode};
