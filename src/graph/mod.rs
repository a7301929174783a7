//! # Graph Arena
//!
//! Owns every node of a navigation graph and is the only place where
//! connectivity changes. Nodes live in slots addressed by [`NodeId`]; an edge
//! `A -> B` is stored in A's edge list and mirrored by a back-reference to A in
//! B, so destroying a node only has to visit its own neighbourhood.
//!
//! ## Invariants
//!
//! - A node never holds two edges to the same target.
//! - Every edge `A -> B` has exactly one back-reference `A` in B, and every
//!   back-reference has exactly one matching edge.
//! - Destroyed slots are never reused, so stale handles stay invalid.
//!
//! ## Concurrency
//!
//! Mutation takes `&mut self`. Shortest-path queries take `&self` and share
//! one [`SearchWorkspace`] behind a mutex, so concurrent queries on the same
//! graph are serialized around the search only.

mod builder;
mod search;

pub use builder::{BuildOutcome, GraphBuilder};
pub use search::SearchWorkspace;

use hashbrown::HashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::model::{Edge, Node, NodeId, Path, PathNode, Vector3};
use crate::{Error, Result};

// ============================================================================
// Configuration
// ============================================================================

/// Construction-time settings for a [`Graph`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Number of nodes to reserve room for, in the arena and the search
    /// workspace alike.
    pub node_capacity: usize,
}

// ============================================================================
// Graph
// ============================================================================

/// Directed, weighted graph of positioned nodes.
#[derive(Debug)]
pub struct Graph {
    slots: Vec<Option<Node>>,
    names: HashMap<String, NodeId>,
    live: usize,
    edge_total: usize,
    workspace: Mutex<SearchWorkspace>,
}

impl Graph {
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            slots: Vec::with_capacity(config.node_capacity),
            names: HashMap::with_capacity(config.node_capacity),
            live: 0,
            edge_total: 0,
            workspace: Mutex::new(SearchWorkspace::with_capacity(config.node_capacity)),
        }
    }

    // ========================================================================
    // Node lifecycle
    // ========================================================================

    /// Create a node with no edges. Names are unique per graph.
    pub fn create_node(&mut self, name: impl Into<String>, position: Vector3) -> Result<NodeId> {
        let name = name.into();
        if self.names.contains_key(&name) {
            tracing::debug!(%name, "rejected duplicate node name");
            return Err(Error::DuplicateNode(name));
        }

        let id = NodeId(self.slots.len() as u32);
        self.names.insert(name.clone(), id);
        self.slots.push(Some(Node::new(name).with_position(position)));
        self.live += 1;
        Ok(id)
    }

    /// Sever every edge into and out of the node, then remove it.
    pub fn destroy_node(&mut self, id: NodeId) -> bool {
        if !self.clear_edges(id) {
            return false;
        }
        let Some(node) = self.slots.get_mut(id.index()).and_then(Option::take) else {
            return false;
        };
        self.names.remove(&node.name);
        self.live -= 1;
        true
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Handle of the node with the given name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Live nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots.iter().enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|node| (NodeId(i as u32), node)))
    }

    pub fn node_count(&self) -> usize {
        self.live
    }

    /// Total number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.edge_total
    }

    /// Size of the handle space, including destroyed slots.
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Euclidean distance between the current positions of two nodes.
    pub fn distance(&self, a: NodeId, b: NodeId) -> Option<f32> {
        Some(self.node(a)?.distance(self.node(b)?))
    }

    /// Stored distance of the edge `from -> to`.
    pub fn edge_distance(&self, from: NodeId, to: NodeId) -> Option<f32> {
        let node = self.node(from)?;
        node.neighbor_index(to).and_then(|i| node.neighbor_distance(i))
    }

    /// Sum of stored edge distances along consecutive graph-backed entries of
    /// `path`. `None` when a step is not an edge of this graph.
    pub fn path_cost(&self, path: &Path<'_>) -> Option<f32> {
        let ids = path.nodes().iter()
            .map(|entry| match entry {
                PathNode::Graph(id) => Some(*id),
                PathNode::Owned(_) => None,
            })
            .collect::<Option<Vec<_>>>()?;
        ids.windows(2).map(|w| self.edge_distance(w[0], w[1])).sum()
    }

    // ========================================================================
    // Edges
    // ========================================================================

    /// Add the edge `from -> to`.
    ///
    /// `distance` of `None` (or any negative / NaN value) stores the Euclidean
    /// distance between the two current positions. Fails when either node is
    /// missing or `to` already is a neighbour of `from`.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, distance: Option<f32>) -> bool {
        let (Some(source), Some(target)) = (self.node(from), self.node(to)) else {
            tracing::debug!(%from, %to, "rejected edge: unknown node");
            return false;
        };
        if source.is_neighbor(to) {
            tracing::debug!(%from, %to, "rejected edge: already a neighbour");
            return false;
        }

        let distance = match distance {
            Some(d) if d >= 0.0 => d,
            _ => source.distance(target),
        };

        if let Some(source) = self.node_mut(from) {
            source.edges.push(Edge { target: to, distance });
        }
        if let Some(target) = self.node_mut(to) {
            target.back_refs.push(from);
        }
        self.edge_total += 1;
        true
    }

    /// Remove the edge `from -> to`. Fails when it does not exist.
    pub fn remove_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        match self.node(from).and_then(|n| n.neighbor_index(to)) {
            Some(index) => self.remove_edge_at(from, index),
            None => {
                tracing::debug!(%from, %to, "no such edge");
                false
            }
        }
    }

    /// Remove the `index`-th outgoing edge of `from`.
    pub fn remove_edge_at(&mut self, from: NodeId, index: usize) -> bool {
        let Some(source) = self.node_mut(from) else {
            return false;
        };
        if index >= source.edges.len() {
            tracing::debug!(%from, index, "edge index out of range");
            return false;
        }

        let edge = source.edges.remove(index);
        if let Some(target) = self.node_mut(edge.target) {
            target.remove_back_ref(from);
        }
        self.edge_total -= 1;
        true
    }

    /// Remove every edge leaving `id` and every edge pointing at it.
    pub fn clear_edges(&mut self, id: NodeId) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let outgoing = std::mem::take(&mut node.edges);
        self.edge_total -= outgoing.len();

        for edge in &outgoing {
            if let Some(target) = self.node_mut(edge.target) {
                target.remove_back_ref(id);
            }
        }

        // A self-loop already dropped its own back-reference above.
        let incoming = self.node_mut(id)
            .map(|node| std::mem::take(&mut node.back_refs))
            .unwrap_or_default();
        for source_id in incoming {
            if let Some(source) = self.node_mut(source_id) {
                if let Some(i) = source.neighbor_index(id) {
                    source.edges.remove(i);
                    self.edge_total -= 1;
                }
            }
        }
        true
    }

    // ========================================================================
    // Positions
    // ========================================================================

    /// Move a node and recompute the distance of every edge touching it,
    /// outgoing and incoming alike. Authored distances are overwritten.
    pub fn set_position(&mut self, id: NodeId, position: Vector3) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let mut outgoing = std::mem::take(&mut node.edges);
        let incoming = node.back_refs.clone();

        for edge in outgoing.iter_mut() {
            let target = if edge.target == id {
                position
            } else {
                self.node(edge.target).map_or(position, Node::position)
            };
            edge.distance = position.distance(target);
        }

        if let Some(node) = self.node_mut(id) {
            node.position = position;
            node.edges = outgoing;
        }

        for source_id in incoming {
            if source_id == id {
                continue;
            }
            if let Some(source) = self.node_mut(source_id) {
                let origin = source.position;
                if let Some(edge) = source.edges.iter_mut().find(|e| e.target == id) {
                    edge.distance = origin.distance(position);
                }
            }
        }
        true
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

/// Clones topology only; the copy starts with its own empty workspace.
impl Clone for Graph {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            names: self.names.clone(),
            live: self.live,
            edge_total: self.edge_total,
            workspace: Mutex::new(SearchWorkspace::with_capacity(self.slots.len())),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
