use std::env;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use sssp_phases_core::{
    approx_eq, dijkstra, optimal_phases, relax, Criterion, CriterionKind, NodeIndex, NodeResult,
    ParseCriterionError, PhaseStats,
};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod edge_list;
mod generate;

use generate::{CostModel, EdgeModel, Generated, GeneratorConfig, PositionModel};

/// Measure how many phases each criteria set needs on random graphs.
#[derive(Parser, Debug)]
#[command(name = "sssp-phases-bench", version)]
struct Args {
    /// Nodes per generated graph (uniform positions)
    #[arg(long, default_value_t = 10_000)]
    nodes: usize,

    /// Expected out-degree of every node
    #[arg(long, default_value_t = 3.0)]
    degree: f64,

    /// Node placement in the unit square
    #[arg(long, value_enum, default_value_t = PositionModel::Uniform)]
    positions: PositionModel,

    /// Minimum spacing of Poisson-disc positions
    #[arg(long, default_value_t = 0.01)]
    min_distance: f64,

    /// Edge generator
    #[arg(long, value_enum, default_value_t = EdgeModel::Uniform)]
    edges: EdgeModel,

    /// Number of horizontal bands for layered edges
    #[arg(long, default_value_t = 10)]
    layers: usize,

    /// Edge cost model
    #[arg(long, value_enum, default_value_t = CostModel::Uniform)]
    costs: CostModel,

    /// Seed of the first run; run `i` uses `seed + i`
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of graphs to generate
    #[arg(long, default_value_t = 1)]
    runs: u64,

    /// Read `source destination [cost]` lines instead of generating graphs;
    /// the first label is the start node
    #[arg(long, value_name = "PATH")]
    graph_file: Option<PathBuf>,

    /// Comma-separated criteria set; repeat to compare several sets
    #[arg(long = "criteria", value_parser = parse_criteria_set)]
    criteria: Vec<CriteriaSet>,

    /// Print `seed,criteria,node_count,phase,relaxed` rows instead of a table
    #[arg(long)]
    csv: bool,
}

impl Args {
    fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            nodes: self.nodes,
            degree: self.degree,
            positions: self.positions,
            min_distance: self.min_distance,
            edges: self.edges,
            layers: self.layers,
            costs: self.costs,
        }
    }
}

#[derive(Debug, Clone)]
struct CriteriaSet(Vec<CriterionKind>);

impl CriteriaSet {
    fn label(&self) -> String {
        self.0.iter().map(|k| k.as_str()).collect::<Vec<_>>().join("+")
    }

    fn is_complete(&self) -> bool {
        self.0.iter().any(|k| k.is_complete())
    }
}

fn parse_criteria_set(s: &str) -> Result<CriteriaSet, ParseCriterionError> {
    s.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect::<Result<Vec<_>, _>>()
        .map(CriteriaSet)
}

fn default_sets() -> Vec<CriteriaSet> {
    use CriterionKind::*;
    vec![
        CriteriaSet(vec![Dijkstra]),
        CriteriaSet(vec![CrauserIn, Dijkstra]),
        CriteriaSet(vec![CrauserInDyn, Dijkstra]),
        CriteriaSet(vec![CrauserOut, Dijkstra]),
        CriteriaSet(vec![CrauserOutDyn, Dijkstra]),
        CriteriaSet(vec![CrauserInDyn, CrauserOutDyn]),
        CriteriaSet(vec![Bridge, Dijkstra]),
        CriteriaSet(vec![Oracle]),
    ]
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    if args.nodes == 0 {
        bail!("--nodes must be at least 1");
    }
    if args.degree.is_nan() || args.degree < 0.0 {
        bail!("--degree must be a non-negative number, got {}", args.degree);
    }
    if args.positions == PositionModel::Poisson && !(1e-3..1.0).contains(&args.min_distance) {
        bail!("--min-distance must lie in [0.001, 1), got {}", args.min_distance);
    }
    if args.layers == 0 {
        bail!("--layers must be at least 1");
    }

    let sets = if args.criteria.is_empty() {
        default_sets()
    } else {
        args.criteria.clone()
    };
    for set in &sets {
        if !set.0.contains(&CriterionKind::Heuristic) {
            continue;
        }
        if args.graph_file.is_some() {
            bail!("criteria set '{}' uses the heuristic, which needs node positions", set.label());
        }
        if args.costs != CostModel::Euclidean {
            bail!(
                "criteria set '{}' uses the heuristic, which is only admissible with --costs euclidean",
                set.label()
            );
        }
    }

    if args.csv {
        println!("seed,criteria,node_count,phase,relaxed");
    } else {
        println!("sssp-phases-bench");
        println!("=================");
        println!();
    }

    if let Some(path) = &args.graph_file {
        let t = Instant::now();
        let loaded = edge_list::read_edge_list(path)?;
        if loaded.graph.node_count() == 0 {
            bail!("graph file {} contains no edges", path.display());
        }
        info!(
            path = %path.display(),
            nodes = loaded.graph.node_count(),
            edges = loaded.graph.edge_count(),
            start = %loaded.labels[0],
            "graph file loaded"
        );
        let load_secs = t.elapsed().as_secs_f64();
        report(&args, &sets, args.seed, &Generated::without_positions(loaded.graph), load_secs)?;
        return Ok(());
    }

    let config = args.generator_config();
    for run in 0..args.runs {
        let seed = args.seed.wrapping_add(run);
        let t = Instant::now();
        let generated = generate::generate(&config, seed)?;
        debug!(
            seed,
            nodes = generated.graph.node_count(),
            edges = generated.graph.edge_count(),
            "graph generated"
        );
        report(&args, &sets, seed, &generated, t.elapsed().as_secs_f64())?;
    }

    Ok(())
}

fn report(args: &Args, sets: &[CriteriaSet], seed: u64, generated: &Generated, gen_secs: f64) -> Result<()> {
    if !args.csv {
        return run_benchmark(generated, sets, seed, gen_secs);
    }
    let node_count = generated.graph.node_count();
    for set in sets {
        let outcome = measure(generated, set)?;
        for (phase, relaxed) in outcome.stats.settled_per_phase.iter().enumerate() {
            println!("{},{},{},{},{}", seed, set.label(), node_count, phase, relaxed);
        }
    }
    Ok(())
}

fn run_benchmark(generated: &Generated, sets: &[CriteriaSet], seed: u64, gen_secs: f64) -> Result<()> {
    let graph = &generated.graph;
    println!("--- seed {} ---", seed);
    println!(
        "Generated in {:.2}s: {} nodes, {} edges",
        gen_secs,
        graph.node_count(),
        graph.edge_count()
    );

    let optimal = optimal_phases(graph, 0).context("computing optimal phases")?;
    let optimal_stats = PhaseStats::from_results(&optimal);
    println!(
        "Reachable from 0: {} nodes, optimal {} phases",
        optimal_stats.reachable, optimal_stats.phases
    );

    println!();
    println!(
        "{:<32} {:>8} {:>10} {:>10} {:>8} {:>10}",
        "criteria", "phases", "widest", "reached", "check", "time"
    );
    println!(
        "{:-<32} {:->8} {:->10} {:->10} {:->8} {:->10}",
        "", "", "", "", "", ""
    );

    for set in sets {
        let outcome = measure(generated, set)?;
        let check = match (outcome.matches_reference, set.is_complete()) {
            (true, _) => "ok",
            (false, true) => "MISMATCH",
            (false, false) => "partial",
        };
        println!(
            "{:<32} {:>8} {:>10} {:>10} {:>8} {:>8.1}ms",
            set.label(),
            outcome.stats.phases,
            outcome.stats.widest_phase(),
            outcome.stats.reachable,
            check,
            outcome.millis
        );
        if !outcome.matches_reference && set.is_complete() {
            bail!("criteria set '{}' disagrees with sequential Dijkstra (seed {seed})", set.label());
        }
    }
    println!();
    Ok(())
}

struct Outcome {
    stats: PhaseStats,
    matches_reference: bool,
    millis: f64,
}

fn measure(generated: &Generated, set: &CriteriaSet) -> Result<Outcome> {
    let graph = &generated.graph;
    let heuristic = |node: NodeIndex| generated.distance_to_start(node);

    let t = Instant::now();
    let mut criteria: Vec<Box<dyn Criterion + '_>> = set
        .0
        .iter()
        .map(|kind| kind.build(graph, 0, Some(&heuristic)))
        .collect::<Result<_, _>>()
        .with_context(|| format!("building criteria set '{}'", set.label()))?;
    let result = relax(graph, 0, &mut criteria)?;
    let millis = t.elapsed().as_secs_f64() * 1000.0;

    let reference = dijkstra(graph, 0)?;
    let matches_reference = same_distances(&reference, &result);
    let stats = PhaseStats::from_results(&result);
    info!(
        criteria = %set.label(),
        phases = stats.phases,
        reached = stats.reachable,
        matches_reference,
        "criteria set measured"
    );

    Ok(Outcome {
        stats,
        matches_reference,
        millis,
    })
}

fn same_distances(reference: &[NodeResult], result: &[NodeResult]) -> bool {
    reference
        .iter()
        .zip(result)
        .all(|(r, x)| r.is_settled() == x.is_settled() && approx_eq(r.distance, x.distance))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SSSP_LOG")
        .unwrap_or_else(|_| EnvFilter::new("sssp_phases=info,warn"));

    let format = env::var("SSSP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry.with(fmt::layer().compact().with_writer(std::io::stderr)).init();
        }
    }
}
