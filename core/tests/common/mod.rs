//! Shared graph builders for the integration tests.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sssp_phases_core::{
    approx_eq, relax, Criterion, CriterionKind, Graph, NodeIndex, NodeResult,
};

/// Random directed graph with 5..=120 nodes, expected out-degree in [1, 5)
/// and uniform costs in [0, 1).
pub fn random_graph(seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let n: usize = rng.gen_range(5..=120);
    let p = rng.gen_range(1.0..5.0) / n as f64;
    let mut g = Graph::with_nodes(n);
    for source in 0..n {
        for destination in 0..n {
            if source != destination && rng.gen_bool(p.min(1.0)) {
                g.add_edge(source, destination, rng.gen_range(0.0..1.0));
            }
        }
    }
    g
}

/// Random graph on uniform points in the unit square with Euclidean costs,
/// plus the straight-line distance from node 0 as an admissible heuristic.
pub fn random_euclidean_graph(seed: u64) -> (Graph, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let n: usize = rng.gen_range(5..=120);
    let p = rng.gen_range(1.0..5.0) / n as f64;
    let points: Vec<(f64, f64)> = (0..n).map(|_| (rng.gen(), rng.gen())).collect();
    let dist = |a: (f64, f64), b: (f64, f64)| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt();

    let mut g = Graph::with_nodes(n);
    for source in 0..n {
        for destination in 0..n {
            if source != destination && rng.gen_bool(p.min(1.0)) {
                g.add_edge(source, destination, dist(points[source], points[destination]));
            }
        }
    }
    let h = points.iter().map(|&pt| dist(points[0], pt)).collect();
    (g, h)
}

pub fn scenario_a() -> Graph {
    let mut g = Graph::with_nodes(4);
    g.add_edge(0, 1, 1.0);
    g.add_edge(0, 2, 0.3);
    g.add_edge(2, 3, 0.3);
    g.add_edge(3, 1, 0.3);
    g
}

//          5 --8--> 4 --3
//                       |  /-- 1 --> 6
//                       v /
// 1 <--100-- 0 --110--> 2 <--\
//            \--105--> 3 --2-/
pub fn scenario_b() -> Graph {
    let mut g = Graph::with_nodes(7);
    g.add_edge(0, 1, 100.0);
    g.add_edge(0, 2, 110.0);
    g.add_edge(0, 3, 105.0);
    g.add_edge(2, 6, 1.0);
    g.add_edge(3, 2, 2.0);
    g.add_edge(4, 2, 3.0);
    g.add_edge(5, 4, 8.0);
    g
}

pub fn complete_graph(n: usize) -> Graph {
    let mut g = Graph::with_nodes(n);
    for i in 0..n {
        for j in 0..n {
            if i != j {
                g.add_edge(i, j, 1.0);
            }
        }
    }
    g
}

/// Run `kinds` from `start`; `h` backs the heuristic criterion if requested.
pub fn run(graph: &Graph, start: NodeIndex, kinds: &[CriterionKind], h: &[f64]) -> Vec<NodeResult> {
    let heuristic = |node: NodeIndex| h.get(node).copied().unwrap_or(0.0);
    let mut criteria: Vec<Box<dyn Criterion + '_>> = kinds
        .iter()
        .map(|k| k.build(graph, start, Some(&heuristic)).unwrap())
        .collect();
    relax(graph, start, &mut criteria).unwrap()
}

/// `kind` alone if complete, otherwise paired with classic Dijkstra.
pub fn completed(kind: CriterionKind) -> Vec<CriterionKind> {
    if kind.is_complete() {
        vec![kind]
    } else {
        vec![kind, CriterionKind::Dijkstra]
    }
}

pub fn assert_same_tree(reference: &[NodeResult], result: &[NodeResult], context: &str) {
    assert_eq!(reference.len(), result.len(), "{context}");
    for (node, (r, x)) in reference.iter().zip(result).enumerate() {
        assert_eq!(r.predecessor, x.predecessor, "{context}: predecessor of node {node}");
        assert!(
            approx_eq(r.distance, x.distance),
            "{context}: distance of node {node}: {} != {}",
            r.distance,
            x.distance
        );
        assert_eq!(r.is_settled(), x.is_settled(), "{context}: settlement of node {node}");
    }
}
