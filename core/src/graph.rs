use thiserror::Error;

/// Dense node index in `0..node_count()`.
pub type NodeIndex = usize;

/// A directed, weighted edge. Stored in both adjacency lists of its endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub source: NodeIndex,
    pub destination: NodeIndex,
    pub cost: f64,
}

/// Precondition violations when adding an edge.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("self-loop on node {0}")]
    SelfLoop(NodeIndex),
    #[error("edge {from} -> {to} has invalid cost {cost}")]
    NegativeCost {
        from: NodeIndex,
        to: NodeIndex,
        cost: f64,
    },
    #[error("duplicate edge {from} -> {to}")]
    DuplicateEdge { from: NodeIndex, to: NodeIndex },
    #[error("node {node} out of range (graph has {node_count} nodes)")]
    NodeOutOfRange { node: NodeIndex, node_count: usize },
}

#[derive(Debug, Clone, Default)]
struct Adjacency {
    outgoing: Vec<Edge>,
    incoming: Vec<Edge>,
}

/// In-memory directed graph over dense node indices.
///
/// Every edge is stored twice: in `outgoing_edges(source)` and in
/// `incoming_edges(destination)`. Write-once: there is no removal.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Adjacency>,
    edge_count: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for a known node count.
    pub fn with_capacity(node_count: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(node_count),
            edge_count: 0,
        }
    }

    /// Graph with `node_count` isolated nodes `0..node_count`.
    pub fn with_nodes(node_count: usize) -> Self {
        Self {
            nodes: vec![Adjacency::default(); node_count],
            edge_count: 0,
        }
    }

    /// Add a node without edges, returning its index.
    pub fn add_node(&mut self) -> NodeIndex {
        self.nodes.push(Adjacency::default());
        self.nodes.len() - 1
    }

    /// Add a directed edge, rejecting self-loops, negative or NaN costs,
    /// duplicates and unknown endpoints.
    pub fn try_add_edge(
        &mut self,
        source: NodeIndex,
        destination: NodeIndex,
        cost: f64,
    ) -> Result<(), GraphError> {
        for node in [source, destination] {
            if node >= self.nodes.len() {
                return Err(GraphError::NodeOutOfRange {
                    node,
                    node_count: self.nodes.len(),
                });
            }
        }
        if source == destination {
            return Err(GraphError::SelfLoop(source));
        }
        if cost.is_nan() || cost < 0.0 {
            return Err(GraphError::NegativeCost {
                from: source,
                to: destination,
                cost,
            });
        }
        if self.cost(source, destination).is_some() {
            return Err(GraphError::DuplicateEdge {
                from: source,
                to: destination,
            });
        }

        let edge = Edge {
            source,
            destination,
            cost,
        };
        self.nodes[source].outgoing.push(edge);
        self.nodes[destination].incoming.push(edge);
        self.edge_count += 1;
        Ok(())
    }

    /// Add a directed edge. Panics on any precondition violation.
    pub fn add_edge(&mut self, source: NodeIndex, destination: NodeIndex, cost: f64) {
        if let Err(err) = self.try_add_edge(source, destination, cost) {
            panic!("invalid edge: {err}");
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Cost of the edge `source -> destination`, if present.
    pub fn cost(&self, source: NodeIndex, destination: NodeIndex) -> Option<f64> {
        // Scan the shorter of the two lists.
        let (out, inc) = (&self.nodes[source].outgoing, &self.nodes[destination].incoming);
        if out.len() <= inc.len() {
            out.iter().find(|e| e.destination == destination).map(|e| e.cost)
        } else {
            inc.iter().find(|e| e.source == source).map(|e| e.cost)
        }
    }

    /// Edges leaving `node`.
    pub fn outgoing_edges(&self, node: NodeIndex) -> &[Edge] {
        &self.nodes[node].outgoing
    }

    /// Edges entering `node`.
    pub fn incoming_edges(&self, node: NodeIndex) -> &[Edge] {
        &self.nodes[node].incoming
    }

    /// Cheapest incoming edge cost of `node`, `+inf` if it has none.
    pub fn cheapest_incoming(&self, node: NodeIndex) -> f64 {
        self.incoming_edges(node)
            .iter()
            .map(|e| e.cost)
            .fold(f64::INFINITY, f64::min)
    }
}
