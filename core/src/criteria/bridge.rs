use std::collections::BTreeSet;

use ordered_float::OrderedFloat;

use super::Criterion;
use crate::graph::{Graph, NodeIndex};
use crate::queue::IndexedQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seen {
    Unexplored,
    Fringe,
    Settled,
}

/// Two-hop refinement of the IN criterion.
///
/// Each unsettled predecessor `p` of `n` contributes a lower bound on the
/// extra cost of reaching `n` through `p`:
///
/// * while `p` is unexplored every path into `p` still runs through an
///   unsettled node, so the bound is `cost(p, n) + cheapest_incoming(p)`;
/// * once `p` is on the fringe the bound drops to `cost(p, n)`.
///
/// `n` is safe once `tentative(n) - min bound` is at most the smallest fringe
/// distance. Settled predecessors are erased from the bound set.
#[derive(Debug, Clone)]
pub struct Bridge<'g> {
    graph: &'g Graph,
    seen: Vec<Seen>,
    tentative: Vec<f64>,
    cheapest_incoming: Vec<f64>,
    bounds: Vec<BTreeSet<(OrderedFloat<f64>, NodeIndex)>>,
    by_distance: IndexedQueue,
    by_threshold: IndexedQueue,
}

impl<'g> Bridge<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        let n = graph.node_count();
        let cheapest_incoming: Vec<f64> = (0..n).map(|node| graph.cheapest_incoming(node)).collect();
        let bounds = (0..n)
            .map(|node| {
                graph
                    .incoming_edges(node)
                    .iter()
                    .map(|e| (OrderedFloat(e.cost + cheapest_incoming[e.source]), e.source))
                    .collect()
            })
            .collect();

        Self {
            graph,
            seen: vec![Seen::Unexplored; n],
            tentative: vec![f64::INFINITY; n],
            cheapest_incoming,
            bounds,
            by_distance: IndexedQueue::new(n),
            by_threshold: IndexedQueue::new(n),
        }
    }

    fn threshold(&self, node: NodeIndex) -> f64 {
        match self.bounds[node].first() {
            Some(&(bound, _)) => self.tentative[node] - bound.0,
            None => f64::NEG_INFINITY,
        }
    }

    fn refresh(&mut self, node: NodeIndex) {
        let threshold = self.threshold(node);
        self.by_threshold.update(node, threshold);
    }

    /// `node` left the unexplored set: its successors' bounds fall back to the
    /// plain edge cost.
    fn discovered(&mut self, node: NodeIndex) {
        let two_hop = self.cheapest_incoming[node];
        for edge in self.graph.outgoing_edges(node) {
            let succ = edge.destination;
            if self.seen[succ] == Seen::Settled {
                continue;
            }
            let removed = self.bounds[succ].remove(&(OrderedFloat(edge.cost + two_hop), node));
            debug_assert!(removed, "bridge: missing two-hop bound {node} -> {succ}");
            self.bounds[succ].insert((OrderedFloat(edge.cost), node));
            self.refresh(succ);
        }
    }
}

impl Criterion for Bridge<'_> {
    fn name(&self) -> &'static str {
        "bridge"
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
        debug_assert_ne!(self.seen[node], Seen::Settled, "bridge: update for settled node {node}");
        if self.seen[node] == Seen::Unexplored {
            self.seen[node] = Seen::Fringe;
            self.discovered(node);
        }
        self.tentative[node] = distance;
        self.by_distance.upsert(node, distance);
        let threshold = self.threshold(node);
        self.by_threshold.upsert(node, threshold);
    }

    fn relaxed_node(&mut self, node: NodeIndex) {
        self.seen[node] = Seen::Settled;
        self.by_distance.remove(node);
        self.by_threshold.remove(node);

        for edge in self.graph.outgoing_edges(node) {
            let succ = edge.destination;
            if self.seen[succ] == Seen::Settled {
                continue;
            }
            self.bounds[succ].remove(&(OrderedFloat(edge.cost), node));
            self.refresh(succ);
        }
    }

    fn is_complete(&self) -> bool {
        false
    }
}
