use std::collections::{BTreeMap, BTreeSet};

use super::{ClassicMinimum, Criterion};
use crate::graph::{Graph, NodeIndex};
use crate::relax::{approx_eq, relax, RelaxError};

/// Non-causal upper bound on parallelism: settles every fringe node whose
/// tentative distance already equals its true distance.
///
/// Ground truth comes from a full sequential run at construction time.
#[derive(Debug, Clone)]
pub struct Oracle {
    truth: Vec<f64>,
    fringe: BTreeMap<NodeIndex, f64>,
}

impl Oracle {
    pub fn new(graph: &Graph, start: NodeIndex) -> Result<Self, RelaxError> {
        let mut reference: [Box<dyn Criterion + '_>; 1] = [Box::new(ClassicMinimum::new(graph))];
        let truth = relax(graph, start, &mut reference)?
            .into_iter()
            .map(|r| r.distance)
            .collect();
        Ok(Self {
            truth,
            fringe: BTreeMap::new(),
        })
    }
}

impl Criterion for Oracle {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn relaxable_nodes(&self, todo: &mut BTreeSet<NodeIndex>) {
        todo.extend(
            self.fringe
                .iter()
                .filter(|&(&node, &distance)| approx_eq(self.truth[node], distance))
                .map(|(&node, _)| node),
        );
    }

    fn changed_predecessor(&mut self, node: NodeIndex, _predecessor: Option<NodeIndex>, distance: f64) {
        self.fringe.insert(node, distance);
    }

    fn relaxed_node(&mut self, node: NodeIndex) {
        self.fringe.remove(&node);
    }

    fn is_complete(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_true_distances_are_relaxable() {
        let mut g = Graph::with_nodes(3);
        g.add_edge(0, 1, 1.0);
        g.add_edge(0, 2, 5.0);
        g.add_edge(1, 2, 1.0);

        let mut oracle = Oracle::new(&g, 0).unwrap();
        oracle.changed_predecessor(0, None, 0.0);
        oracle.relaxed_node(0);
        oracle.changed_predecessor(1, Some(0), 1.0);
        oracle.changed_predecessor(2, Some(0), 5.0);

        let mut todo = BTreeSet::new();
        oracle.relaxable_nodes(&mut todo);
        assert_eq!(todo.into_iter().collect::<Vec<_>>(), vec![1]);

        oracle.changed_predecessor(2, Some(1), 2.0);
        let mut todo = BTreeSet::new();
        oracle.relaxable_nodes(&mut todo);
        assert_eq!(todo.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_rejects_bad_start() {
        let g = Graph::with_nodes(1);
        assert!(Oracle::new(&g, 4).is_err());
    }
}
