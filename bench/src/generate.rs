//! Seeded random workloads: node positions in the unit square, then edges.
//!
//! Every generator draws from one `StdRng`, so a seed fully determines the
//! graph.

use std::f64::consts::{SQRT_2, TAU};

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_distr::{Binomial, Distribution};
use sssp_phases_core::{Graph, NodeIndex};

pub type Point = (f64, f64);

/// Candidates drawn around an active sample before it is retired.
const POISSON_REJECTION_LIMIT: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CostModel {
    /// Uniform in [0, 1)
    Uniform,
    /// Every edge costs 1
    One,
    /// Straight-line distance between the endpoints
    Euclidean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PositionModel {
    /// `--nodes` points uniform in the unit square
    Uniform,
    /// Poisson-disc sampling; the node count follows from `--min-distance`
    Poisson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EdgeModel {
    /// Destinations drawn uniformly from all other nodes
    Uniform,
    /// Horizontal bands; edges only join adjacent bands
    Layered,
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub nodes: usize,
    pub degree: f64,
    pub positions: PositionModel,
    pub min_distance: f64,
    pub edges: EdgeModel,
    pub layers: usize,
    pub costs: CostModel,
}

pub struct Generated {
    pub graph: Graph,
    pub points: Vec<Point>,
}

impl Generated {
    /// A loaded graph has no geometry; every node sits at the origin.
    pub fn without_positions(graph: Graph) -> Self {
        let points = vec![(0.0, 0.0); graph.node_count()];
        Self { graph, points }
    }

    /// Straight-line distance to node 0, a lower bound for Euclidean costs.
    pub fn distance_to_start(&self, node: NodeIndex) -> f64 {
        euclidean(self.points[0], self.points[node])
    }
}

pub fn euclidean(a: Point, b: Point) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

pub fn generate(config: &GeneratorConfig, seed: u64) -> Result<Generated> {
    let mut rng = StdRng::seed_from_u64(seed);
    let points = match config.positions {
        PositionModel::Uniform => uniform_positions(&mut rng, config.nodes),
        PositionModel::Poisson => {
            poisson_disc_positions(&mut rng, config.min_distance, POISSON_REJECTION_LIMIT)
        }
    };

    let mut graph = Graph::with_nodes(points.len());
    match config.edges {
        EdgeModel::Uniform => uniform_edges(&mut rng, &mut graph, &points, config)?,
        EdgeModel::Layered => layered_edges(&mut rng, &mut graph, &points, config)?,
    }

    Ok(Generated { graph, points })
}

pub fn uniform_positions(rng: &mut StdRng, count: usize) -> Vec<Point> {
    (0..count).map(|_| (rng.gen(), rng.gen())).collect()
}

/// Bridson-style dart throwing: no two points closer than `min_distance`.
///
/// Candidates come from the annulus `[r, 2r)` around a random active sample.
/// A background grid with cells of side `r / sqrt(2)` holds at most one
/// sample each, so only the 5x5 block around a candidate needs checking.
pub fn poisson_disc_positions(rng: &mut StdRng, min_distance: f64, rejection_limit: usize) -> Vec<Point> {
    let cell = min_distance / SQRT_2;
    let cells = (1.0 / cell).ceil() as usize;
    let cell_of = |p: Point| ((p.0 / cell) as usize, (p.1 / cell) as usize);

    let mut grid: Vec<Option<usize>> = vec![None; cells * cells];
    let mut samples: Vec<Point> = vec![(rng.gen(), rng.gen())];
    let (x, y) = cell_of(samples[0]);
    grid[x + y * cells] = Some(0);
    let mut active = vec![0];

    let min_sq = min_distance * min_distance;
    while !active.is_empty() {
        let slot = rng.gen_range(0..active.len());
        let root = samples[active[slot]];

        let mut placed = false;
        for _ in 0..rejection_limit {
            let theta = rng.gen_range(0.0..TAU);
            let radius = rng.gen_range(min_sq..4.0 * min_sq).sqrt();
            let candidate = (root.0 + radius * theta.cos(), root.1 + radius * theta.sin());
            if !(0.0..1.0).contains(&candidate.0) || !(0.0..1.0).contains(&candidate.1) {
                continue;
            }

            let (cx, cy) = cell_of(candidate);
            let clear = (cy.saturating_sub(2)..=(cy + 2).min(cells - 1)).all(|y| {
                (cx.saturating_sub(2)..=(cx + 2).min(cells - 1)).all(|x| {
                    grid[x + y * cells].map_or(true, |i| euclidean(samples[i], candidate) >= min_distance)
                })
            });
            if clear {
                grid[cx + cy * cells] = Some(samples.len());
                active.push(samples.len());
                samples.push(candidate);
                placed = true;
                break;
            }
        }

        if !placed {
            active.swap_remove(slot);
        }
    }

    samples
}

fn edge_cost(rng: &mut StdRng, costs: CostModel, from: Point, to: Point) -> f64 {
    match costs {
        CostModel::Uniform => rng.gen_range(0.0..1.0),
        CostModel::One => 1.0,
        CostModel::Euclidean => euclidean(from, to),
    }
}

/// Connect `source` to `k ~ Binomial(len, degree / len)` distinct candidates.
fn connect_sample(
    rng: &mut StdRng,
    graph: &mut Graph,
    points: &[Point],
    config: &GeneratorConfig,
    source: NodeIndex,
    candidates: impl Fn(usize) -> NodeIndex,
    len: usize,
) -> Result<()> {
    if len == 0 {
        return Ok(());
    }
    let p = (config.degree / len as f64).min(1.0);
    let k = Binomial::new(len as u64, p)
        .map_err(|e| anyhow!("invalid --degree: {e}"))?
        .sample(rng) as usize;

    for slot in index::sample(rng, len, k).iter() {
        let destination = candidates(slot);
        let cost = edge_cost(rng, config.costs, points[source], points[destination]);
        graph
            .try_add_edge(source, destination, cost)
            .with_context(|| format!("generating edge {source} -> {destination}"))?;
    }
    Ok(())
}

/// Every node draws `Binomial(n - 1, degree / (n - 1))` distinct destinations
/// other than itself.
fn uniform_edges(rng: &mut StdRng, graph: &mut Graph, points: &[Point], config: &GeneratorConfig) -> Result<()> {
    let others = points.len().saturating_sub(1);
    for source in 0..points.len() {
        // skip over `source` itself
        let pick = |slot: usize| if slot >= source { slot + 1 } else { slot };
        connect_sample(rng, graph, points, config, source, pick, others)?;
    }
    Ok(())
}

fn layer_of(layers: usize, y: f64) -> usize {
    ((y * layers as f64).floor() as usize).min(layers - 1)
}

/// Nodes are bucketed into `layers` horizontal bands by their y coordinate;
/// each node draws destinations from the bands directly above and below.
fn layered_edges(rng: &mut StdRng, graph: &mut Graph, points: &[Point], config: &GeneratorConfig) -> Result<()> {
    let layers = config.layers.max(1);
    let mut bands: Vec<Vec<NodeIndex>> = vec![Vec::new(); layers];
    for (node, point) in points.iter().enumerate() {
        bands[layer_of(layers, point.1)].push(node);
    }

    for source in 0..points.len() {
        let band = layer_of(layers, points[source].1);
        let mut candidates: Vec<NodeIndex> = Vec::new();
        if band > 0 {
            candidates.extend_from_slice(&bands[band - 1]);
        }
        if band + 1 < layers {
            candidates.extend_from_slice(&bands[band + 1]);
        }
        let len = candidates.len();
        connect_sample(rng, graph, points, config, source, |slot| candidates[slot], len)?;
    }
    Ok(())
}
