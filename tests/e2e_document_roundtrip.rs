//! Document round-trip tests: save a graph or path → load it back → compare.

use navgraph::document::{self, GraphDocument, NeighbourRecord, NodeRecord, PathDocument};
use navgraph::{Error, Graph, Vector3, FORMAT_VERSION};
use pretty_assertions::assert_eq;

/// gate -> yard -> dock, gate -> dock with an authored detour cost.
fn seed_graph() -> Graph {
    let mut graph = Graph::new();
    let gate = graph.create_node("gate", Vector3::new(0.0, 0.0, 0.0)).unwrap();
    let yard = graph.create_node("yard", Vector3::new(4.0, 0.0, 3.0)).unwrap();
    let dock = graph.create_node("dock", Vector3::new(4.0, 0.0, 9.0)).unwrap();
    graph.add_edge(gate, yard, None);
    graph.add_edge(yard, dock, None);
    graph.add_edge(gate, dock, Some(20.0));
    graph.add_edge(dock, gate, None);
    graph
}

/// Route builder diagnostics to the test harness output.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn save(graph: &Graph) -> String {
    let mut buf = Vec::new();
    document::save_graph(graph, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn test_graph_round_trip_preserves_topology() {
    init_tracing();
    let original = seed_graph();
    let text = save(&original);

    let outcome = document::load_graph(text.as_bytes()).unwrap();
    assert!(outcome.is_clean(), "{:?}", outcome.diagnostics);
    let loaded = outcome.graph;

    assert_eq!(GraphDocument::from_graph(&loaded), GraphDocument::from_graph(&original));
    assert_eq!(loaded.edge_count(), 4);

    let (gate, dock) = (loaded.find("gate").unwrap(), loaded.find("dock").unwrap());
    assert_eq!(loaded.edge_distance(gate, dock), Some(20.0));
    assert_eq!(loaded.shortest_distance(gate, dock), Some(11.0));
}

#[test]
fn test_saved_document_shape() {
    let doc = GraphDocument::from_graph(&seed_graph());
    assert_eq!(doc.version, FORMAT_VERSION);
    assert_eq!(
        doc.nodes[0],
        NodeRecord {
            name: "gate".into(),
            position: Vector3::ZERO,
            neighbours: vec![
                NeighbourRecord { name: "yard".into(), distance: Some(5.0) },
                NeighbourRecord { name: "dock".into(), distance: Some(20.0) },
            ],
        }
    );
    assert!(doc.nodes[1].neighbours.iter().all(|n| n.name == "dock"));
}

#[test]
fn test_duplicate_names_in_document_are_diagnosed() {
    init_tracing();
    let doc = GraphDocument {
        version: FORMAT_VERSION,
        nodes: vec![
            NodeRecord { name: "a".into(), position: Vector3::ZERO, neighbours: vec![] },
            NodeRecord { name: "a".into(), position: Vector3::new(1.0, 1.0, 1.0), neighbours: vec![] },
        ],
    };
    let outcome = doc.into_graph().unwrap();
    assert_eq!(outcome.graph.node_count(), 1);
    assert!(matches!(outcome.diagnostics.as_slice(), [Error::DuplicateNode(name)] if name == "a"));
}

#[test]
fn test_destroyed_nodes_are_not_saved() {
    let mut graph = seed_graph();
    graph.destroy_node(graph.find("yard").unwrap());
    let doc = GraphDocument::from_graph(&graph);
    let names: Vec<&str> = doc.nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["gate", "dock"]);
}

#[test]
fn test_path_round_trip_owned() {
    let graph = seed_graph();
    let mut path = graph
        .find_shortest_path(graph.find("gate").unwrap(), graph.find("dock").unwrap())
        .unwrap();
    path.set_closed(true);

    let mut buf = Vec::new();
    document::save_path(&path, &mut buf).unwrap();
    let loaded = document::load_path(buf.as_slice()).unwrap();

    assert!(loaded.is_closed());
    assert_eq!(loaded.node_count(), 3);
    assert_eq!(loaded.length(), path.length());
    assert_eq!(loaded.node(1).unwrap().name(), "yard");
}

#[test]
fn test_path_document_resolves_against_graph() {
    let graph = seed_graph();
    let doc: PathDocument = serde_json::from_str(
        r#"{ "version": 1, "closed": false, "nodes": [ { "name": "dock" }, { "name": "gate" } ] }"#,
    )
    .unwrap();

    let path = doc.into_path_on(&graph).unwrap();
    assert_eq!(path.node_id(0), graph.find("dock"));
    assert_eq!(path.node_position(0), Some(Vector3::new(4.0, 0.0, 9.0)));
    assert_eq!(graph.path_cost(&path), graph.edge_distance(graph.find("dock").unwrap(), graph.find("gate").unwrap()));
}
