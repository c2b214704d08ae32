//! sssp-phases-core: phase-based single-source shortest paths.
//!
//! A pure Rust library that runs a generalized Dijkstra in synchronous
//! phases. Which fringe nodes settle in a phase is decided by pluggable
//! criteria (classic minimum, Crauser IN/OUT, bridge, oracle, heuristic), so
//! the number of phases measures how much of the computation could have run
//! in parallel. Every complete criteria set reproduces sequential Dijkstra.
//!
//! Phases are simulated: the engine is single-threaded and deterministic.

mod criteria;
mod graph;
mod queue;
mod relax;

pub use criteria::{
    Bridge, ClassicMinimum, CrauserIn, CrauserOut, Criterion, CriterionKind, Heuristic, Oracle,
    ParseCriterionError, Pruning,
};
pub use graph::{Edge, Graph, GraphError, NodeIndex};
pub use relax::{
    approx_eq, dijkstra, optimal_phases, relax, NodeResult, PhaseStats, RelaxError,
};
