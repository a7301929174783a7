//! Node — a positioned vertex with weighted outgoing edges.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::Vector3;

/// Stable node handle: an index into the owning graph's arena.
///
/// Handles are never reused by the graph that issued them, so a handle to a
/// destroyed node stays invalid instead of aliasing a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed, weighted connection to another node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub target: NodeId,
    pub distance: f32,
}

/// Inline capacity for per-node edge lists. Waypoint graphs are sparse.
pub(crate) type EdgeList = SmallVec<[Edge; 4]>;
pub(crate) type BackRefList = SmallVec<[NodeId; 4]>;

/// A node in the navigation graph.
///
/// Outside a graph a node is a plain named position; this is what an owning
/// [`Path`](super::Path) stores. Inside a graph the edge and back-reference
/// lists are maintained by [`Graph`](crate::Graph), which is the only place
/// that may mutate them.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) position: Vector3,
    /// Outgoing edges, in insertion order. No two share a target.
    pub(crate) edges: EdgeList,
    /// Nodes that hold an edge pointing at this node.
    pub(crate) back_refs: BackRefList,
}

impl Node {
    /// Standalone node at the origin with no edges.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vector3::ZERO,
            edges: EdgeList::new(),
            back_refs: BackRefList::new(),
        }
    }

    pub fn with_position(mut self, position: Vector3) -> Self {
        self.position = position;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    /// Euclidean distance between the current positions of two nodes.
    pub fn distance(&self, other: &Node) -> f32 {
        self.position.distance(other.position)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn neighbor_count(&self) -> usize {
        self.edges.len()
    }

    /// Target of the `index`-th outgoing edge, or `None` when out of range.
    pub fn neighbor(&self, index: usize) -> Option<NodeId> {
        self.edges.get(index).map(|e| e.target)
    }

    /// Distance of the `index`-th outgoing edge, or `None` when out of range.
    pub fn neighbor_distance(&self, index: usize) -> Option<f32> {
        self.edges.get(index).map(|e| e.distance)
    }

    /// Position of `target` in the outgoing edge list.
    pub fn neighbor_index(&self, target: NodeId) -> Option<usize> {
        self.edges.iter().position(|e| e.target == target)
    }

    pub fn is_neighbor(&self, target: NodeId) -> bool {
        self.neighbor_index(target).is_some()
    }

    /// Nodes with an edge pointing at this one.
    pub fn back_references(&self) -> &[NodeId] {
        &self.back_refs
    }

    /// Copy of this node without graph connectivity, suitable for an owning path.
    pub fn detached(&self) -> Self {
        Self::new(self.name.clone()).with_position(self.position)
    }

    pub(crate) fn remove_back_ref(&mut self, source: NodeId) -> bool {
        match self.back_refs.iter().position(|&id| id == source) {
            Some(i) => {
                self.back_refs.remove(i);
                true
            }
            None => false,
        }
    }
}
