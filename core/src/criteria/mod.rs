//! Settlement criteria: strategies deciding which fringe nodes already hold
//! their final distance.
//!
//! Every criterion keeps its own per-node bookkeeping and learns about the run
//! only through the engine's `changed_predecessor` / `relaxed_node` broadcasts.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::graph::{Graph, NodeIndex};
use crate::relax::RelaxError;

mod bridge;
mod classic;
mod crauser;
mod heuristic;
mod oracle;

pub use bridge::Bridge;
pub use classic::ClassicMinimum;
pub use crauser::{CrauserIn, CrauserOut, Pruning};
pub use heuristic::Heuristic;
pub use oracle::Oracle;

/// Shared interface of every settlement strategy.
pub trait Criterion {
    /// Short kebab-case name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Add every node this criterion currently proves safe to settle.
    /// Called once per phase, before any settlement in that phase.
    fn relaxable_nodes(&self, todo: &mut BTreeSet<NodeIndex>);

    /// `node`'s best known distance improved. Called before the matching
    /// `relaxed_node` if `node` settles in the same phase.
    fn changed_predecessor(&mut self, node: NodeIndex, predecessor: Option<NodeIndex>, distance: f64);

    /// `node` is permanently settled. Called exactly once per node, after all
    /// `changed_predecessor` calls of its phase.
    fn relaxed_node(&mut self, node: NodeIndex);

    /// True if this criterion alone eventually returns every fringe node.
    fn is_complete(&self) -> bool;
}

/// Closed set of available criteria, as named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CriterionKind {
    Dijkstra,
    CrauserIn,
    CrauserInDyn,
    CrauserOut,
    CrauserOutDyn,
    Oracle,
    Heuristic,
    Bridge,
}

impl CriterionKind {
    pub const ALL: [CriterionKind; 8] = [
        CriterionKind::Dijkstra,
        CriterionKind::CrauserIn,
        CriterionKind::CrauserInDyn,
        CriterionKind::CrauserOut,
        CriterionKind::CrauserOutDyn,
        CriterionKind::Oracle,
        CriterionKind::Heuristic,
        CriterionKind::Bridge,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CriterionKind::Dijkstra => "dijkstra",
            CriterionKind::CrauserIn => "crauser-in",
            CriterionKind::CrauserInDyn => "crauser-in-dyn",
            CriterionKind::CrauserOut => "crauser-out",
            CriterionKind::CrauserOutDyn => "crauser-out-dyn",
            CriterionKind::Oracle => "oracle",
            CriterionKind::Heuristic => "heuristic",
            CriterionKind::Bridge => "bridge",
        }
    }

    pub fn is_complete(self) -> bool {
        matches!(self, CriterionKind::Dijkstra | CriterionKind::Oracle)
    }

    /// Instantiate the criterion for a run on `graph` from `start`.
    ///
    /// `heuristic` is required for [`CriterionKind::Heuristic`] and ignored otherwise.
    pub fn build<'g>(
        self,
        graph: &'g Graph,
        start: NodeIndex,
        heuristic: Option<&dyn Fn(NodeIndex) -> f64>,
    ) -> Result<Box<dyn Criterion + 'g>, RelaxError> {
        if start >= graph.node_count() {
            return Err(RelaxError::StartOutOfRange {
                start,
                node_count: graph.node_count(),
            });
        }
        Ok(match self {
            CriterionKind::Dijkstra => Box::new(ClassicMinimum::new(graph)),
            CriterionKind::CrauserIn => Box::new(CrauserIn::new(graph, Pruning::Static)),
            CriterionKind::CrauserInDyn => Box::new(CrauserIn::new(graph, Pruning::Dynamic)),
            CriterionKind::CrauserOut => Box::new(CrauserOut::new(graph, Pruning::Static)),
            CriterionKind::CrauserOutDyn => Box::new(CrauserOut::new(graph, Pruning::Dynamic)),
            CriterionKind::Oracle => Box::new(Oracle::new(graph, start)?),
            CriterionKind::Bridge => Box::new(Bridge::new(graph)),
            CriterionKind::Heuristic => {
                let h = heuristic.ok_or(RelaxError::MissingHeuristic)?;
                Box::new(Heuristic::new(graph, h))
            }
        })
    }
}

impl fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown criterion '{0}'")]
pub struct ParseCriterionError(pub String);

impl FromStr for CriterionKind {
    type Err = ParseCriterionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('_', "-");
        if name == "traff" {
            return Ok(CriterionKind::Bridge);
        }
        CriterionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| ParseCriterionError(s.to_string()))
    }
}
