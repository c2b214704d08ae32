//! Crauser et al.'s IN and OUT criteria for parallel SSSP.
//!
//! Both keep two queues over the fringe: one by tentative distance and one by
//! a per-node threshold derived from the node's cheapest edge. With
//! [`Pruning::Dynamic`] the cheapest edge only ranges over neighbours that are
//! not settled yet, which tightens the bound as the run progresses.

use std::collections::BTreeSet;

use super::Criterion;
use crate::graph::{Edge, Graph, NodeIndex};
use crate::queue::IndexedQueue;

/// Whether settled neighbours are dropped from the cheapest-edge bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pruning {
    /// Cheapest edge over all neighbours, fixed at construction.
    Static,
    /// Cheapest edge over unsettled neighbours, pruned as neighbours settle.
    Dynamic,
}

/// Per-node neighbour costs sorted descending, so the cheapest sits at the
/// back and settled neighbours can be popped off cheaply.
#[derive(Debug, Clone)]
struct SortedNeighbors {
    lists: Vec<Vec<(NodeIndex, f64)>>,
}

impl SortedNeighbors {
    fn new(graph: &Graph, edges: impl Fn(NodeIndex) -> Vec<(NodeIndex, f64)>) -> Self {
        let lists = (0..graph.node_count())
            .map(|node| {
                let mut list = edges(node);
                list.sort_by(|a, b| b.1.total_cmp(&a.1));
                list
            })
            .collect();
        Self { lists }
    }

    fn cheapest(&self, node: NodeIndex) -> Option<f64> {
        self.lists[node].last().map(|&(_, cost)| cost)
    }

    fn prune(&mut self, node: NodeIndex, settled: &[bool]) {
        let list = &mut self.lists[node];
        while list.last().is_some_and(|&(neighbor, _)| settled[neighbor]) {
            list.pop();
        }
    }
}

/// IN criterion: `n` is safe once `tentative(n) - cheapest_incoming(n)` is at
/// most the smallest fringe distance.
#[derive(Debug, Clone)]
pub struct CrauserIn<'g> {
    graph: &'g Graph,
    pruning: Pruning,
    tentative: Vec<f64>,
    settled: Vec<bool>,
    incoming: SortedNeighbors,
    by_distance: IndexedQueue,
    by_threshold: IndexedQueue,
}

impl<'g> CrauserIn<'g> {
    pub fn new(graph: &'g Graph, pruning: Pruning) -> Self {
        let n = graph.node_count();
        Self {
            graph,
            pruning,
            tentative: vec![f64::INFINITY; n],
            settled: vec![false; n],
            incoming: SortedNeighbors::new(graph, |node| {
                graph
                    .incoming_edges(node)
                    .iter()
                    .map(|e: &Edge| (e.source, e.cost))
                    .collect()
            }),
            by_distance: IndexedQueue::new(n),
            by_threshold: IndexedQueue::new(n),
        }
    }

    fn threshold(&self, node: NodeIndex) -> f64 {
        match self.incoming.cheapest(node) {
            Some(cost) => self.tentative[node] - cost,
            None => f64::NEG_INFINITY,
        }
    }
}

impl Criterion for CrauserIn<'_> {
    fn name(&self) -> &'static str {
        match self.pruning {
            Pruning::Static => "crauser-in",
            Pruning::Dynamic => "crauser-in-dyn",
        }
    }

    fn relaxable_nodes(&self, todo: &mut BTreeSet<NodeIndex>) {
        let Some((_, min_distance)) = self.by_distance.peek() else {
            return;
        };
        todo.extend(
            self.by_threshold
                .iter()
                .take_while(|&(_, threshold)| threshold <= min_distance)
                .map(|(node, _)| node),
        );
    }

    fn changed_predecessor(&mut self, node: NodeIndex, _predecessor: Option<NodeIndex>, distance: f64) {
        debug_assert!(!self.settled[node], "crauser-in: update for settled node {node}");
        self.tentative[node] = distance;
        self.by_distance.upsert(node, distance);
        let threshold = self.threshold(node);
        self.by_threshold.upsert(node, threshold);
    }

    fn relaxed_node(&mut self, node: NodeIndex) {
        self.settled[node] = true;
        self.by_distance.remove(node);
        self.by_threshold.remove(node);

        if self.pruning == Pruning::Dynamic {
            for edge in self.graph.outgoing_edges(node) {
                let dest = edge.destination;
                if self.settled[dest] {
                    continue;
                }
                self.incoming.prune(dest, &self.settled);
                let threshold = self.threshold(dest);
                self.by_threshold.update(dest, threshold);
            }
        }
    }

    fn is_complete(&self) -> bool {
        false
    }
}

/// OUT criterion: every fringe `n` with `tentative(n) <= L` is safe, where
/// `L = min(tentative(m) + cheapest_outgoing(m))` over the fringe.
#[derive(Debug, Clone)]
pub struct CrauserOut<'g> {
    graph: &'g Graph,
    pruning: Pruning,
    tentative: Vec<f64>,
    settled: Vec<bool>,
    outgoing: SortedNeighbors,
    by_distance: IndexedQueue,
    by_threshold: IndexedQueue,
}

impl<'g> CrauserOut<'g> {
    pub fn new(graph: &'g Graph, pruning: Pruning) -> Self {
        let n = graph.node_count();
        Self {
            graph,
            pruning,
            tentative: vec![f64::INFINITY; n],
            settled: vec![false; n],
            outgoing: SortedNeighbors::new(graph, |node| {
                graph
                    .outgoing_edges(node)
                    .iter()
                    .map(|e: &Edge| (e.destination, e.cost))
                    .collect()
            }),
            by_distance: IndexedQueue::new(n),
            by_threshold: IndexedQueue::new(n),
        }
    }

    fn threshold(&self, node: NodeIndex) -> f64 {
        match self.outgoing.cheapest(node) {
            Some(cost) => self.tentative[node] + cost,
            None => f64::INFINITY,
        }
    }
}

impl Criterion for CrauserOut<'_> {
    fn name(&self) -> &'static str {
        match self.pruning {
            Pruning::Static => "crauser-out",
            Pruning::Dynamic => "crauser-out-dyn",
        }
    }

    fn relaxable_nodes(&self, todo: &mut BTreeSet<NodeIndex>) {
        let Some((_, limit)) = self.by_threshold.peek() else {
            return;
        };
        todo.extend(
            self.by_distance
                .iter()
                .take_while(|&(_, distance)| distance <= limit)
                .map(|(node, _)| node),
        );
    }

    fn changed_predecessor(&mut self, node: NodeIndex, _predecessor: Option<NodeIndex>, distance: f64) {
        debug_assert!(!self.settled[node], "crauser-out: update for settled node {node}");
        self.tentative[node] = distance;
        self.by_distance.upsert(node, distance);
        let threshold = self.threshold(node);
        self.by_threshold.upsert(node, threshold);
    }

    fn relaxed_node(&mut self, node: NodeIndex) {
        self.settled[node] = true;
        self.by_distance.remove(node);
        self.by_threshold.remove(node);

        if self.pruning == Pruning::Dynamic {
            for edge in self.graph.incoming_edges(node) {
                let source = edge.source;
                if self.settled[source] {
                    continue;
                }
                self.outgoing.prune(source, &self.settled);
                let threshold = self.threshold(source);
                self.by_threshold.update(source, threshold);
            }
        }
    }

    fn is_complete(&self) -> bool {
        false
    }
}
