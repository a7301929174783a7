//! Graph and path documents — the persisted form of a navigation graph.
//!
//! Documents are versioned JSON. Each document type dispatches on its
//! `version` field in one place (`into_graph` / `into_path`), so older layouts
//! can keep their own routine when the format moves on. A missing version
//! reads as 0 and is rejected.
//!
//! ```text
//! { "version": 1,
//!   "nodes": [ { "name": "gate", "position": {"x":0,"y":0,"z":0},
//!                "neighbours": [ { "name": "yard", "distance": 12.5 } ] } ] }
//! ```
//!
//! A neighbour without `distance` gets the Euclidean distance at load time.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::graph::{BuildOutcome, Graph, GraphBuilder};
use crate::model::{Node, Path, Vector3};
use crate::{Error, Result};

/// Current document format version.
pub const FORMAT_VERSION: u32 = 1;

// ============================================================================
// Graph documents
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub name: String,
    #[serde(default)]
    pub position: Vector3,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub neighbours: Vec<NeighbourRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighbourRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
}

impl GraphDocument {
    /// Snapshot of every live node and its outgoing edges, in creation order.
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph.nodes()
            .map(|(_, node)| NodeRecord {
                name: node.name().to_string(),
                position: node.position(),
                neighbours: node.edges().iter()
                    .filter_map(|edge| {
                        graph.node(edge.target).map(|target| NeighbourRecord {
                            name: target.name().to_string(),
                            distance: Some(edge.distance),
                        })
                    })
                    .collect(),
            })
            .collect();
        Self { version: FORMAT_VERSION, nodes }
    }

    pub fn into_graph(self) -> Result<BuildOutcome> {
        match self.version {
            1 => Ok(self.load_v1()),
            found => Err(unsupported(found)),
        }
    }

    fn load_v1(self) -> BuildOutcome {
        let mut builder = GraphBuilder::new();
        for record in self.nodes {
            for neighbour in record.neighbours {
                builder = builder.edge(record.name.clone(), neighbour.name, neighbour.distance);
            }
            builder = builder.node(record.name, record.position);
        }
        builder.build()
    }
}

// ============================================================================
// Path documents
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathDocument {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub nodes: Vec<PathNodeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathNodeRecord {
    pub name: String,
    #[serde(default)]
    pub position: Vector3,
}

impl PathDocument {
    pub fn from_path(path: &Path<'_>) -> Self {
        let nodes = (0..path.node_count())
            .filter_map(|i| path.node(i))
            .map(|node| PathNodeRecord { name: node.name().to_string(), position: node.position() })
            .collect();
        Self { version: FORMAT_VERSION, closed: path.is_closed(), nodes }
    }

    /// Standalone path owning a copy of every listed node.
    pub fn into_path(self) -> Result<Path<'static>> {
        self.check_version()?;
        let mut path = Path::new();
        path.set_closed(self.closed);
        for record in self.nodes {
            path.push_node(Node::new(record.name).with_position(record.position));
        }
        Ok(path)
    }

    /// Path over `graph`, resolving node names. Stored positions are ignored;
    /// the graph's current positions win.
    pub fn into_path_on(self, graph: &Graph) -> Result<Path<'_>> {
        self.check_version()?;
        let mut path = Path::on_graph(graph);
        path.set_closed(self.closed);
        for record in self.nodes {
            let id = graph.find(&record.name).ok_or(Error::UnknownNode(record.name))?;
            path.push_graph_node(id);
        }
        Ok(path)
    }

    fn check_version(&self) -> Result<()> {
        match self.version {
            1 => Ok(()),
            found => Err(unsupported(found)),
        }
    }
}

fn unsupported(found: u32) -> Error {
    tracing::warn!(found, expected = FORMAT_VERSION, "unsupported document version");
    Error::UnsupportedVersion { expected: FORMAT_VERSION, found }
}

// ============================================================================
// Reader / writer entry points
// ============================================================================

pub fn save_graph(graph: &Graph, writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &GraphDocument::from_graph(graph))?;
    writeln!(writer)?;
    Ok(())
}

#[tracing::instrument(level = "debug", skip_all)]
pub fn load_graph(reader: impl Read) -> Result<BuildOutcome> {
    serde_json::from_reader::<_, GraphDocument>(reader)?.into_graph()
}

pub fn save_path(path: &Path<'_>, writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &PathDocument::from_path(path))?;
    writeln!(writer)?;
    Ok(())
}

#[tracing::instrument(level = "debug", skip_all)]
pub fn load_path(reader: impl Read) -> Result<Path<'static>> {
    serde_json::from_reader::<_, PathDocument>(reader)?.into_path()
}
