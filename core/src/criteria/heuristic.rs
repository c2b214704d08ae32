use std::collections::BTreeSet;

use super::Criterion;
use crate::graph::{Graph, NodeIndex};

/// Settles `n` once `tentative(n) <= h(p) + cost(p, n)` for every unsettled
/// predecessor `p`, given a heuristic `h` that never overestimates the
/// distance from the start.
///
/// Incomplete on its own: pair it with a complete criterion. An inadmissible
/// `h` is not detected and yields wrong distances.
#[derive(Debug, Clone)]
pub struct Heuristic<'g> {
    graph: &'g Graph,
    tentative: Vec<f64>,
    settled: Vec<bool>,
    /// `(predecessor, h(predecessor) + cost)`, sorted descending.
    predecessors: Vec<Vec<(NodeIndex, f64)>>,
    safe: BTreeSet<NodeIndex>,
}

impl<'g> Heuristic<'g> {
    pub fn new(graph: &'g Graph, h: impl Fn(NodeIndex) -> f64) -> Self {
        let n = graph.node_count();
        let estimates: Vec<f64> = (0..n).map(&h).collect();
        let predecessors = (0..n)
            .map(|node| {
                let mut list: Vec<(NodeIndex, f64)> = graph
                    .incoming_edges(node)
                    .iter()
                    .map(|e| (e.source, estimates[e.source] + e.cost))
                    .collect();
                list.sort_by(|a, b| b.1.total_cmp(&a.1));
                list
            })
            .collect();

        Self {
            graph,
            tentative: vec![f64::INFINITY; n],
            settled: vec![false; n],
            predecessors,
            safe: BTreeSet::new(),
        }
    }

    fn prune(&mut self, node: NodeIndex) {
        let settled = &self.settled;
        let list = &mut self.predecessors[node];
        while list.last().is_some_and(|&(pred, _)| settled[pred]) {
            list.pop();
        }
    }

    /// Once safe, a node stays safe: bounds only grow and distances only shrink.
    fn check(&mut self, node: NodeIndex) {
        if self.settled[node] || !self.tentative[node].is_finite() {
            return;
        }
        let safe = match self.predecessors[node].last() {
            Some(&(_, bound)) => self.tentative[node] <= bound,
            None => true,
        };
        if safe {
            self.safe.insert(node);
        }
    }
}

impl Criterion for Heuristic<'_> {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn relaxable_nodes(&self, todo: &mut BTreeSet<NodeIndex>) {
        todo.extend(self.safe.iter().copied());
    }

    fn changed_predecessor(&mut self, node: NodeIndex, _predecessor: Option<NodeIndex>, distance: f64) {
        debug_assert!(!self.settled[node], "heuristic: update for settled node {node}");
        self.tentative[node] = distance;
        self.check(node);
    }

    fn relaxed_node(&mut self, node: NodeIndex) {
        self.settled[node] = true;
        self.safe.remove(&node);

        for edge in self.graph.outgoing_edges(node) {
            let succ = edge.destination;
            self.prune(succ);
            self.check(succ);
        }
    }

    fn is_complete(&self) -> bool {
        false
    }
}
