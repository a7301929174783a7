//! Name-based graph construction.
//!
//! Loaders describe a graph as node requests `(name, position)` and edge
//! requests `(source, target, distance?)`. Conflicts do not abort the build:
//! the offending request is skipped and reported in
//! [`BuildOutcome::diagnostics`].

use crate::model::Vector3;
use crate::Error;
use super::{Graph, GraphConfig};

#[derive(Debug, Clone)]
struct EdgeRequest {
    source: String,
    target: String,
    distance: Option<f32>,
}

/// Collects node and edge requests, then builds a [`Graph`] in one pass.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    config: GraphConfig,
    nodes: Vec<(String, Vector3)>,
    edges: Vec<EdgeRequest>,
}

/// A built graph and the requests that were rejected while building it.
#[derive(Debug)]
pub struct BuildOutcome {
    pub graph: Graph,
    pub diagnostics: Vec<Error>,
}

impl BuildOutcome {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    pub fn node(mut self, name: impl Into<String>, position: Vector3) -> Self {
        self.nodes.push((name.into(), position));
        self
    }

    /// Edge request; `None` distance means "Euclidean at build time".
    pub fn edge(mut self, source: impl Into<String>, target: impl Into<String>, distance: Option<f32>) -> Self {
        self.edges.push(EdgeRequest { source: source.into(), target: target.into(), distance });
        self
    }

    /// Create all nodes first, then all edges, so edge requests may name
    /// nodes declared after them.
    pub fn build(self) -> BuildOutcome {
        let config = GraphConfig {
            node_capacity: self.config.node_capacity.max(self.nodes.len()),
        };
        let mut graph = Graph::with_config(config);
        let mut diagnostics = Vec::new();

        for (name, position) in self.nodes {
            if let Err(err) = graph.create_node(name, position) {
                tracing::warn!(error = %err, "skipped node request");
                diagnostics.push(err);
            }
        }

        for request in self.edges {
            let Some(from) = graph.find(&request.source) else {
                diagnostics.push(Error::UnknownNode(request.source));
                continue;
            };
            let Some(to) = graph.find(&request.target) else {
                diagnostics.push(Error::UnknownNode(request.target));
                continue;
            };
            if !graph.add_edge(from, to, request.distance) {
                diagnostics.push(Error::DuplicateEdge { from: request.source, to: request.target });
            }
        }

        if !diagnostics.is_empty() {
            tracing::warn!(count = diagnostics.len(), "graph built with rejected requests");
        }
        BuildOutcome { graph, diagnostics }
    }
}
