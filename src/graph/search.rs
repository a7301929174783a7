//! Single-source shortest path (Dijkstra) with reusable scratch buffers.
//!
//! The buffers are sized to the graph's handle space and logically reset at
//! the start of every query, so repeated queries on a stable graph do not
//! allocate once the buffers have grown.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::model::{NodeId, Path};
use super::Graph;

// ============================================================================
// Priority queue entry
// ============================================================================

/// Min-heap entry. Equal distances pop in insertion order.
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    distance: f32,
    sequence: u64,
    node: NodeId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other.distance.total_cmp(&self.distance)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

// ============================================================================
// SearchWorkspace
// ============================================================================

/// Per-graph scratch state for [`Graph::find_shortest_path`].
#[derive(Debug, Default)]
pub struct SearchWorkspace {
    distances: Vec<f32>,
    predecessors: Vec<Option<NodeId>>,
    seen: Vec<bool>,
    finalized: Vec<bool>,
    queue: BinaryHeap<QueueEntry>,
    sequence: u64,
}

impl SearchWorkspace {
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            distances: Vec::with_capacity(nodes),
            predecessors: Vec::with_capacity(nodes),
            seen: Vec::with_capacity(nodes),
            finalized: Vec::with_capacity(nodes),
            queue: BinaryHeap::with_capacity(nodes),
            sequence: 0,
        }
    }

    /// Number of nodes the per-node buffers can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.distances.capacity()
    }

    fn reset(&mut self, slots: usize) {
        self.distances.clear();
        self.distances.resize(slots, f32::INFINITY);
        self.predecessors.clear();
        self.predecessors.resize(slots, None);
        self.seen.clear();
        self.seen.resize(slots, false);
        self.finalized.clear();
        self.finalized.resize(slots, false);
        self.queue.clear();
        self.sequence = 0;
    }

    fn push(&mut self, node: NodeId, distance: f32) {
        self.queue.push(QueueEntry { distance, sequence: self.sequence, node });
        self.sequence += 1;
    }

    /// Node chain from `start` to `end` plus its total cost, or `None` when
    /// `end` is unreachable.
    fn run(&mut self, graph: &Graph, start: NodeId, end: NodeId) -> Option<(Vec<NodeId>, f32)> {
        self.reset(graph.slot_count());

        self.distances[start.index()] = 0.0;
        self.seen[start.index()] = true;
        self.push(start, 0.0);

        while let Some(QueueEntry { distance, node, .. }) = self.queue.pop() {
            let u = node.index();
            if self.finalized[u] || distance > self.distances[u] {
                continue; // stale entry
            }
            if node == end {
                return Some((self.trace(start, end), distance));
            }
            self.finalized[u] = true;

            let Some(current) = graph.node(node) else {
                continue;
            };
            for edge in current.edges() {
                let v = edge.target.index();
                if self.finalized[v] {
                    continue;
                }
                let candidate = distance + edge.distance;
                if !self.seen[v] || candidate < self.distances[v] {
                    self.seen[v] = true;
                    self.distances[v] = candidate;
                    self.predecessors[v] = Some(node);
                    self.push(edge.target, candidate);
                }
            }
        }

        None
    }

    fn trace(&self, start: NodeId, end: NodeId) -> Vec<NodeId> {
        let mut chain = vec![end];
        let mut current = end;
        while current != start && chain.len() <= self.predecessors.len() {
            let Some(previous) = self.predecessors[current.index()] else {
                break;
            };
            chain.push(previous);
            current = previous;
        }
        chain.reverse();
        chain
    }
}

// ============================================================================
// Queries
// ============================================================================

impl Graph {
    /// Cheapest route from `start` to `end` along stored edge distances.
    ///
    /// The returned path borrows this graph's nodes, is open, and lists the
    /// nodes in travel order. `start == end` yields a single-node path;
    /// an unreachable or unknown `end` yields `None`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn find_shortest_path(&self, start: NodeId, end: NodeId) -> Option<Path<'_>> {
        self.shortest_route(start, end)
            .map(|(ids, _)| Path::from_graph_nodes(self, ids))
    }

    /// Cost of the cheapest route from `start` to `end`.
    pub fn shortest_distance(&self, start: NodeId, end: NodeId) -> Option<f32> {
        self.shortest_route(start, end).map(|(_, cost)| cost)
    }

    fn shortest_route(&self, start: NodeId, end: NodeId) -> Option<(Vec<NodeId>, f32)> {
        if !self.contains(start) || !self.contains(end) {
            tracing::debug!(%start, %end, "shortest path query on unknown node");
            return None;
        }
        if start == end {
            return Some((vec![start], 0.0));
        }

        let route = self.workspace.lock().run(self, start, end);
        if route.is_none() {
            tracing::debug!(%start, %end, "no path");
        }
        route
    }
}

// ============================================================================
// Tests
// ============================================================================
