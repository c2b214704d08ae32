use std::collections::BTreeSet;

use ordered_float::OrderedFloat;

use crate::graph::NodeIndex;

/// Min-ordered queue of node indices keyed by `f64`, with update and erase.
///
/// The key slot per node doubles as the handle: a node is queued iff its slot
/// is `Some`. Ties order by node index, so iteration is deterministic.
#[derive(Debug, Clone)]
pub(crate) struct IndexedQueue {
    keys: Vec<Option<OrderedFloat<f64>>>,
    order: BTreeSet<(OrderedFloat<f64>, NodeIndex)>,
}

impl IndexedQueue {
    pub fn new(node_count: usize) -> Self {
        Self {
            keys: vec![None; node_count],
            order: BTreeSet::new(),
        }
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        self.keys[node].is_some()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Insert `node`, or move it to `key` if already queued.
    pub fn upsert(&mut self, node: NodeIndex, key: f64) {
        let key = OrderedFloat(key);
        if let Some(old) = self.keys[node].replace(key) {
            if old == key {
                return;
            }
            self.order.remove(&(old, node));
        }
        self.order.insert((key, node));
    }

    /// Reposition `node` only if it is queued.
    pub fn update(&mut self, node: NodeIndex, key: f64) {
        if self.contains(node) {
            self.upsert(node, key);
        }
    }

    pub fn remove(&mut self, node: NodeIndex) -> bool {
        match self.keys[node].take() {
            Some(old) => self.order.remove(&(old, node)),
            None => false,
        }
    }

    /// Smallest `(node, key)`.
    pub fn peek(&self) -> Option<(NodeIndex, f64)> {
        self.order.first().map(|&(key, node)| (node, key.0))
    }

    /// All queued nodes in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, f64)> + '_ {
        self.order.iter().map(|&(key, node)| (node, key.0))
    }
}
