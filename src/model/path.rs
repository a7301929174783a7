//! Path — an ordered, optionally closed sequence of nodes that can be sampled
//! as a continuous curve.
//!
//! A path either borrows nodes from a [`Graph`] (what shortest-path queries
//! return) or owns detached node copies (a designer-authored route, or a path
//! that must outlive graph mutation). Both kinds may be mixed in one path as
//! long as graph-backed entries belong to the path's graph.
//!
//! Sampling comes in two flavours:
//!
//! | Query | Parameter | Open path | Closed path |
//! |-------|-----------|-----------|-------------|
//! | [`Path::position_at_node_index`] | fractional node index | clamped | wrapped modulo node count |
//! | [`Path::position_at_percentage`] | fraction of arc length | wrapped into `[0, 1)` | wrapped into `[0, 1)` |

use crate::Graph;
use super::{Node, NodeId, Vector3};

/// One entry of a [`Path`].
#[derive(Debug, Clone, PartialEq)]
pub enum PathNode {
    /// Node owned by the path's graph.
    Graph(NodeId),
    /// Private copy owned by the path itself.
    Owned(Node),
}

/// An ordered sequence of nodes. Duplicates are allowed.
#[derive(Debug, Clone)]
pub struct Path<'g> {
    graph: Option<&'g Graph>,
    nodes: Vec<PathNode>,
    closed: bool,
}

impl Path<'static> {
    /// Empty path that owns its nodes.
    pub fn new() -> Self {
        Self { graph: None, nodes: Vec::new(), closed: false }
    }

    /// Owning path through the given positions, with generated node names.
    pub fn from_positions(positions: impl IntoIterator<Item = Vector3>) -> Self {
        let mut path = Self::new();
        for (i, position) in positions.into_iter().enumerate() {
            path.push_node(Node::new(format!("node{i}")).with_position(position));
        }
        path
    }
}

impl Default for Path<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'g> Path<'g> {
    /// Empty path whose entries may reference nodes of `graph`.
    pub fn on_graph(graph: &'g Graph) -> Self {
        Self { graph: Some(graph), nodes: Vec::new(), closed: false }
    }

    pub(crate) fn from_graph_nodes(graph: &'g Graph, ids: Vec<NodeId>) -> Self {
        Self {
            graph: Some(graph),
            nodes: ids.into_iter().map(PathNode::Graph).collect(),
            closed: false,
        }
    }

    pub fn graph(&self) -> Option<&'g Graph> {
        self.graph
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Append a node of the path's graph. Fails when the path has no graph
    /// or the graph has no such node.
    pub fn push_graph_node(&mut self, id: NodeId) -> bool {
        match self.graph {
            Some(graph) if graph.contains(id) => {
                self.nodes.push(PathNode::Graph(id));
                true
            }
            _ => {
                tracing::debug!(node = %id, "rejected path node: not part of the path's graph");
                false
            }
        }
    }

    /// Append a node owned by the path.
    pub fn push_node(&mut self, node: Node) {
        self.nodes.push(PathNode::Owned(node));
    }

    /// Remove the entry at `index`. An owned node is handed back to the caller.
    pub fn remove_node(&mut self, index: usize) -> Option<PathNode> {
        (index < self.nodes.len()).then(|| self.nodes.remove(index))
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Copy every entry into an owned node, releasing the borrow on the graph.
    pub fn detach(&self) -> Path<'static> {
        let nodes = self.nodes.iter()
            .filter_map(|entry| self.resolve(entry))
            .map(|node| PathNode::Owned(node.detached()))
            .collect();
        Path { graph: None, nodes, closed: self.closed }
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// The node at `index`, resolved through the graph for borrowed entries.
    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index).and_then(|entry| self.resolve(entry))
    }

    /// Graph handle of the entry at `index`, if it is graph-backed.
    pub fn node_id(&self, index: usize) -> Option<NodeId> {
        match self.nodes.get(index)? {
            PathNode::Graph(id) => Some(*id),
            PathNode::Owned(_) => None,
        }
    }

    pub fn node_position(&self, index: usize) -> Option<Vector3> {
        self.node(index).map(Node::position)
    }

    fn resolve<'a>(&'a self, entry: &'a PathNode) -> Option<&'a Node> {
        match entry {
            PathNode::Graph(id) => self.graph.and_then(|g| g.node(*id)),
            PathNode::Owned(node) => Some(node),
        }
    }

    /// Position of a known-valid entry.
    fn position_of(&self, index: usize) -> Vector3 {
        self.node_position(index).unwrap_or(Vector3::ZERO)
    }

    // ========================================================================
    // Length
    // ========================================================================

    /// Number of segments walked: `n - 1` when open, `n` when closed.
    pub fn segment_count(&self) -> usize {
        match self.nodes.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    /// Sum of the distances between consecutive nodes, including the return
    /// leg when closed.
    pub fn length(&self) -> f32 {
        let count = self.nodes.len();
        (0..self.segment_count())
            .map(|i| self.position_of(i).distance(self.position_of((i + 1) % count)))
            .sum()
    }

    // ========================================================================
    // Sampling
    // ========================================================================

    /// Position at a fractional node index.
    ///
    /// `smooth` selects Catmull-Rom over the four control points
    /// `P[i], P[i+1], P[i+2], P[i+3]` where `i = floor(index)`; the curve runs
    /// from `P[i+1]` to `P[i+2]`. On an open path the index is clamped to
    /// `[0, n-1]` (linear) or `[0, n-3]` (smooth) and control points past the
    /// end repeat the last node. On a closed path the index and the control
    /// points wrap.
    ///
    /// An open path with fewer than four nodes has no full smooth span: the
    /// index clamps to 0 and every smooth sample is `P[1]`.
    ///
    /// Returns `None` for an empty path.
    pub fn position_at_node_index(&self, index: f32, smooth: bool) -> Option<Vector3> {
        match self.nodes.len() {
            0 => return None,
            1 => return self.node_position(0),
            _ => {}
        }

        let (base, t) = self.split_index(index, smooth);
        if smooth {
            let [p1, p2, p3, p4] = [0, 1, 2, 3].map(|k| self.position_of(self.control_index(base + k)));
            Some(catmull_rom(p1, p2, p3, p4, t))
        } else {
            let current = self.position_of(base);
            let next = self.position_of(self.control_index(base + 1));
            Some(current.lerp(next, t))
        }
    }

    /// Position after travelling `fraction` of the path's length.
    ///
    /// `fraction` is wrapped into `[0, 1)`, so `1.0` maps back to the first
    /// node. The linear variant interpolates straight along the segment the
    /// target arc length falls in.
    ///
    /// The smooth variant locates the same segment and local progress, then
    /// evaluates a Catmull-Rom span between the segment's endpoints using the
    /// neighbouring nodes as outer control points. Progress is still measured
    /// along the straight segments, not along the curve.
    ///
    /// Returns `None` for an empty path.
    pub fn position_at_percentage(&self, fraction: f32, smooth: bool) -> Option<Vector3> {
        let count = self.nodes.len();
        match count {
            0 => return None,
            1 => return self.node_position(0),
            _ => {}
        }

        let total = self.length();
        if total <= 0.0 {
            return self.node_position(0);
        }

        let target = wrap_unit(fraction) * total;
        let mut travelled = 0.0;
        for segment in 0..self.segment_count() {
            let next = (segment + 1) % count;
            let from = self.position_of(segment);
            let to = self.position_of(next);
            let segment_length = from.distance(to);

            if travelled + segment_length >= target {
                let progress = if segment_length > 0.0 {
                    ((target - travelled) / segment_length).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                if !smooth {
                    return Some(from.lerp(to, progress));
                }
                let before = self.position_of(self.previous_index(segment));
                let after = self.position_of(self.control_index(segment + 2));
                return Some(catmull_rom(before, from, to, after, progress));
            }
            travelled += segment_length;
        }

        // Rounding left the target just past the accumulated total.
        self.node_position(if self.closed { 0 } else { count - 1 })
    }

    /// Clamp or wrap a fractional index, then split it into `(floor, t)`.
    fn split_index(&self, index: f32, smooth: bool) -> (usize, f32) {
        let count = self.nodes.len();
        let last = count - 1;
        let index = if index.is_finite() { index } else { 0.0 };

        let index = if self.closed {
            index.rem_euclid(count as f32)
        } else {
            let upper = if smooth { count.saturating_sub(3) } else { last };
            index.clamp(0.0, upper as f32)
        };

        let base = index.floor() as usize;
        if base > last {
            // rem_euclid may round a tiny negative index up to `count`
            return (if self.closed { 0 } else { last }, 0.0);
        }
        (base, index - base as f32)
    }

    fn control_index(&self, index: usize) -> usize {
        let count = self.nodes.len();
        if self.closed { index % count } else { index.min(count - 1) }
    }

    fn previous_index(&self, index: usize) -> usize {
        let count = self.nodes.len();
        if self.closed { (index + count - 1) % count } else { index.saturating_sub(1) }
    }
}

/// Wrap into `[0, 1)`.
fn wrap_unit(fraction: f32) -> f32 {
    if !fraction.is_finite() {
        return 0.0;
    }
    let mut f = fraction.fract();
    if f < 0.0 {
        f += 1.0;
    }
    if f >= 1.0 { 0.0 } else { f }
}

/// Uniform Catmull-Rom: passes through `p2` at `t = 0` and `p3` at `t = 1`.
fn catmull_rom(p1: Vector3, p2: Vector3, p3: Vector3, p4: Vector3, t: f32) -> Vector3 {
    let t2 = t * t;
    let t3 = t2 * t;
    let w1 = -t + 2.0 * t2 - t3;
    let w2 = 2.0 - 5.0 * t2 + 3.0 * t3;
    let w3 = t + 4.0 * t2 - 3.0 * t3;
    let w4 = -t2 + t3;
    (p1 * w1 + p2 * w2 + p3 * w3 + p4 * w4) * 0.5
}
