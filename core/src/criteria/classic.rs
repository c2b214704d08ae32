use std::collections::BTreeSet;

use super::Criterion;
use crate::graph::{Graph, NodeIndex};
use crate::queue::IndexedQueue;

/// Sequential Dijkstra: settles the single fringe node with the smallest
/// tentative distance per phase.
#[derive(Debug, Clone)]
pub struct ClassicMinimum {
    queue: IndexedQueue,
}

impl ClassicMinimum {
    pub fn new(graph: &Graph) -> Self {
        Self {
            queue: IndexedQueue::new(graph.node_count()),
        }
    }
}

impl Criterion for ClassicMinimum {
    fn name(&self) -> &'static str {
        "dijkstra"
    }

    fn relaxable_nodes(&self, todo: &mut BTreeSet<NodeIndex>) {
        if let Some((node, _)) = self.queue.peek() {
            todo.insert(node);
        }
    }

    fn changed_predecessor(&mut self, node: NodeIndex, _predecessor: Option<NodeIndex>, distance: f64) {
        self.queue.upsert(node, distance);
    }

    fn relaxed_node(&mut self, node: NodeIndex) {
        self.queue.remove(node);
    }

    fn is_complete(&self) -> bool {
        true
    }
}
