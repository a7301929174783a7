//! End-to-end tests for shortest-path queries.
//!
//! Dijkstra results are checked against exhaustive enumeration of simple
//! paths on small random graphs, plus the fixed cases: same start and end,
//! unreachable targets, and repeated queries on one graph.

use navgraph::{Graph, NodeId, Path, Vector3};
use proptest::prelude::*;

// ============================================================================
// Helpers
// ============================================================================

fn ids(path: &Path<'_>) -> Vec<NodeId> {
    (0..path.node_count()).filter_map(|i| path.node_id(i)).collect()
}

/// Graph with `n` nodes on the x axis and the given weighted edges.
/// Duplicate edge requests are dropped by the graph itself.
fn build(n: usize, edges: &[(usize, usize, u8)]) -> (Graph, Vec<NodeId>) {
    let mut graph = Graph::new();
    let nodes: Vec<NodeId> = (0..n)
        .map(|i| graph.create_node(format!("n{i}"), Vector3::new(i as f32, 0.0, 0.0)).unwrap())
        .collect();
    for &(from, to, weight) in edges {
        graph.add_edge(nodes[from % n], nodes[to % n], Some(weight as f32));
    }
    (graph, nodes)
}

/// Minimum cost over all simple paths, by depth-first enumeration.
fn brute_force(graph: &Graph, start: NodeId, end: NodeId) -> Option<f32> {
    fn walk(graph: &Graph, at: NodeId, end: NodeId, cost: f32, visited: &mut Vec<NodeId>, best: &mut Option<f32>) {
        if at == end {
            *best = Some(best.map_or(cost, |b: f32| b.min(cost)));
            return;
        }
        for edge in graph.node(at).unwrap().edges() {
            if visited.contains(&edge.target) {
                continue;
            }
            visited.push(edge.target);
            walk(graph, edge.target, end, cost + edge.distance, visited, best);
            visited.pop();
        }
    }

    let mut best = None;
    walk(graph, start, end, 0.0, &mut vec![start], &mut best);
    best
}

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize, u8)>)> {
    (2usize..7).prop_flat_map(|n| {
        (Just(n), prop::collection::vec((0..n, 0..n, 0u8..20), 0..18))
    })
}

// ============================================================================
// 1. Dijkstra agrees with brute force
// ============================================================================

proptest! {
    #[test]
    fn shortest_path_matches_brute_force((n, edges) in graph_strategy(), s in 0usize..7, e in 0usize..7) {
        let (graph, nodes) = build(n, &edges);
        let (start, end) = (nodes[s % n], nodes[e % n]);

        let expected = brute_force(&graph, start, end);
        let found = graph.find_shortest_path(start, end);

        match expected {
            None => prop_assert!(found.is_none()),
            Some(cost) => {
                let path = found.expect("brute force found a route");
                let path_ids = ids(&path);
                prop_assert_eq!(path_ids.first().copied(), Some(start));
                prop_assert_eq!(path_ids.last().copied(), Some(end));
                let walked = graph.path_cost(&path).expect("consecutive nodes are edges");
                prop_assert!((walked - cost).abs() < 1e-4, "walked {} vs brute force {}", walked, cost);
                prop_assert_eq!(graph.shortest_distance(start, end), Some(walked));
            }
        }
    }

    #[test]
    fn repeated_queries_are_identical((n, edges) in graph_strategy(), s in 0usize..7, e in 0usize..7) {
        let (graph, nodes) = build(n, &edges);
        let (start, end) = (nodes[s % n], nodes[e % n]);

        let first = graph.find_shortest_path(start, end).map(|p| ids(&p));
        // unrelated query in between to dirty the workspace
        let _ = graph.find_shortest_path(end, start);
        let second = graph.find_shortest_path(start, end).map(|p| ids(&p));
        prop_assert_eq!(first, second);
    }
}

// ============================================================================
// 2. Fixed cases
// ============================================================================

#[test]
fn test_same_node_every_graph() {
    let (graph, nodes) = build(4, &[(0, 1, 3), (1, 2, 3), (2, 3, 3)]);
    for &node in &nodes {
        let path = graph.find_shortest_path(node, node).unwrap();
        assert_eq!(ids(&path), vec![node]);
        assert_eq!(path.length(), 0.0);
        assert_eq!(graph.path_cost(&path), Some(0.0));
    }
}

#[test]
fn test_unreachable_differs_from_zero_length() {
    let (graph, nodes) = build(3, &[(0, 1, 1)]);
    assert!(graph.find_shortest_path(nodes[0], nodes[2]).is_none());
    assert!(graph.find_shortest_path(nodes[1], nodes[0]).is_none());
    assert!(graph.find_shortest_path(nodes[2], nodes[2]).is_some());
}

#[test]
fn test_path_after_topology_change() {
    let (mut graph, nodes) = build(3, &[(0, 1, 1), (1, 2, 1), (0, 2, 5)]);
    assert_eq!(graph.shortest_distance(nodes[0], nodes[2]), Some(2.0));

    graph.remove_edge(nodes[1], nodes[2]);
    let path = graph.find_shortest_path(nodes[0], nodes[2]).unwrap();
    assert_eq!(ids(&path), vec![nodes[0], nodes[2]]);

    graph.destroy_node(nodes[2]);
    assert!(graph.find_shortest_path(nodes[0], nodes[2]).is_none());
}

#[test]
fn test_result_samples_along_graph_positions() {
    let mut graph = Graph::new();
    let a = graph.create_node("a", Vector3::new(0.0, 0.0, 0.0)).unwrap();
    let b = graph.create_node("b", Vector3::new(3.0, 0.0, 0.0)).unwrap();
    let c = graph.create_node("c", Vector3::new(3.0, 4.0, 0.0)).unwrap();
    graph.add_edge(a, b, None);
    graph.add_edge(b, c, None);

    let path = graph.find_shortest_path(a, c).unwrap();
    assert!(std::ptr::eq(path.graph().unwrap(), &graph));
    assert_eq!(path.length(), 7.0);
    assert_eq!(path.position_at_node_index(0.5, false), Some(Vector3::new(1.5, 0.0, 0.0)));
}

#[test]
fn test_concurrent_queries_share_one_graph() {
    let (graph, nodes) = build(5, &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 4, 1), (0, 4, 9)]);
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..50 {
                    assert_eq!(graph.shortest_distance(nodes[0], nodes[4]), Some(4.0));
                }
            });
        }
    });
}
