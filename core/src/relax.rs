use std::collections::{BTreeSet, VecDeque};

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::criteria::{ClassicMinimum, Criterion};
use crate::graph::{Graph, NodeIndex};

/// Final state of one node after a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeResult {
    pub predecessor: Option<NodeIndex>,
    /// `+inf` for nodes never reached.
    pub distance: f64,
    /// Phase in which the node settled, `None` if it never did.
    pub phase: Option<u32>,
}

impl NodeResult {
    pub const UNEXPLORED: NodeResult = NodeResult {
        predecessor: None,
        distance: f64::INFINITY,
        phase: None,
    };

    pub fn is_unexplored(&self) -> bool {
        self.phase.is_none() && !self.distance.is_finite()
    }

    pub fn is_fringe(&self) -> bool {
        self.phase.is_none() && self.distance.is_finite()
    }

    pub fn is_settled(&self) -> bool {
        self.phase.is_some()
    }
}

impl Default for NodeResult {
    fn default() -> Self {
        Self::UNEXPLORED
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelaxError {
    #[error("start node {start} out of range (graph has {node_count} nodes)")]
    StartOutOfRange { start: NodeIndex, node_count: usize },
    #[error("at least one criterion is required")]
    NoCriteria,
    #[error("the heuristic criterion needs a heuristic function")]
    MissingHeuristic,
}

/// Distance equality used for every "matches reference" comparison.
pub fn approx_eq(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= 4.0 * f64::EPSILON * scale
}

/// Phase-based generalized Dijkstra.
///
/// Each phase settles the union of every criterion's relaxable nodes as one
/// batch: all of them are marked settled before any of their edges is
/// scanned, so the scan order within a phase cannot leak into the result.
/// If the criteria are not collectively complete the run may stop with fringe
/// nodes left unsettled; this is logged, not reported as an error.
pub fn relax(
    graph: &Graph,
    start: NodeIndex,
    criteria: &mut [Box<dyn Criterion + '_>],
) -> Result<Vec<NodeResult>, RelaxError> {
    let node_count = graph.node_count();
    if start >= node_count {
        return Err(RelaxError::StartOutOfRange { start, node_count });
    }
    if criteria.is_empty() {
        return Err(RelaxError::NoCriteria);
    }
    if !criteria.iter().any(|c| c.is_complete()) {
        warn!(
            criteria = %criteria_names(criteria),
            "no complete criterion in set; the run may stall with fringe nodes left"
        );
    }

    let mut info = vec![NodeResult::UNEXPLORED; node_count];
    info[start].distance = 0.0;
    for crit in criteria.iter_mut() {
        crit.changed_predecessor(start, None, 0.0);
    }

    let mut todo: BTreeSet<NodeIndex> = BTreeSet::new();
    let mut phase: u32 = 0;
    loop {
        todo.clear();
        for crit in criteria.iter() {
            crit.relaxable_nodes(&mut todo);
        }
        if todo.is_empty() {
            break;
        }

        // Settle the whole batch first.
        for &node in &todo {
            let current = &mut info[node];
            assert!(
                current.is_fringe(),
                "node {node} selected in phase {phase} is not on the fringe: {current:?}"
            );
            current.phase = Some(phase);
        }

        for &node in &todo {
            let distance = info[node].distance;
            for edge in graph.outgoing_edges(node) {
                let candidate = distance + edge.cost;
                let dest = &mut info[edge.destination];
                if dest.is_settled() || candidate >= dest.distance {
                    continue;
                }
                dest.distance = candidate;
                dest.predecessor = Some(node);
                for crit in criteria.iter_mut() {
                    crit.changed_predecessor(edge.destination, Some(node), candidate);
                }
            }
        }

        for &node in &todo {
            for crit in criteria.iter_mut() {
                crit.relaxed_node(node);
            }
        }

        trace!(phase, settled = todo.len(), "phase complete");
        phase += 1;
    }

    let stalled = info.iter().filter(|r| r.is_fringe()).count();
    if stalled > 0 {
        warn!(
            criteria = %criteria_names(criteria),
            stalled,
            phases = phase,
            "run stopped with fringe nodes unsettled"
        );
    }
    debug!(
        criteria = %criteria_names(criteria),
        start,
        nodes = node_count,
        phases = phase,
        "relaxation finished"
    );

    Ok(info)
}

/// Sequential Dijkstra, the reference every criteria set is compared against.
pub fn dijkstra(graph: &Graph, start: NodeIndex) -> Result<Vec<NodeResult>, RelaxError> {
    let mut criteria: [Box<dyn Criterion + '_>; 1] = [Box::new(ClassicMinimum::new(graph))];
    relax(graph, start, &mut criteria)
}

/// Lower bound on the phases any causal criterion can achieve.
///
/// A node can only settle with a final predecessor `p` whose edge is tight,
/// `d[p] + cost(p, n) == d[n]`, after `p` itself has settled. The bound is
/// therefore the hop count from `start` over tight edges, taking the
/// shallowest of tied shortest paths. `predecessor` is the tight predecessor
/// realising that depth.
pub fn optimal_phases(graph: &Graph, start: NodeIndex) -> Result<Vec<NodeResult>, RelaxError> {
    let mut result = dijkstra(graph, start)?;
    for r in result.iter_mut() {
        r.phase = None;
        if r.distance.is_finite() {
            r.predecessor = None;
        }
    }

    result[start].phase = Some(0);
    let mut frontier = VecDeque::from([start]);
    while let Some(node) = frontier.pop_front() {
        let (distance, phase) = (result[node].distance, result[node].phase.unwrap_or(0));
        for edge in graph.outgoing_edges(node) {
            let dest = &mut result[edge.destination];
            if dest.phase.is_some() || !approx_eq(distance + edge.cost, dest.distance) {
                continue;
            }
            dest.phase = Some(phase + 1);
            dest.predecessor = Some(node);
            frontier.push_back(edge.destination);
        }
    }

    Ok(result)
}

/// Per-run summary of how settlement spread over phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseStats {
    pub node_count: usize,
    pub reachable: usize,
    /// Number of phases, i.e. highest phase + 1.
    pub phases: usize,
    pub settled_per_phase: Vec<usize>,
}

impl PhaseStats {
    pub fn from_results(results: &[NodeResult]) -> Self {
        let mut settled_per_phase: Vec<usize> = Vec::new();
        for phase in results.iter().filter_map(|r| r.phase) {
            let phase = phase as usize;
            if settled_per_phase.len() <= phase {
                settled_per_phase.resize(phase + 1, 0);
            }
            settled_per_phase[phase] += 1;
        }
        Self {
            node_count: results.len(),
            reachable: settled_per_phase.iter().sum(),
            phases: settled_per_phase.len(),
            settled_per_phase,
        }
    }

    /// Largest batch settled in a single phase.
    pub fn widest_phase(&self) -> usize {
        self.settled_per_phase.iter().copied().max().unwrap_or(0)
    }
}

fn criteria_names(criteria: &[Box<dyn Criterion + '_>]) -> String {
    criteria.iter().map(|c| c.name()).collect::<Vec<_>>().join(",")
}
