use proptest::prelude::*;
use sssp_phases_core::{
    approx_eq, dijkstra, optimal_phases, CriterionKind, Graph, NodeIndex, PhaseStats,
};

mod common;
use common::*;

const SEEDS: u64 = 60;

const NON_EUCLIDEAN: [CriterionKind; 7] = [
    CriterionKind::Dijkstra,
    CriterionKind::CrauserIn,
    CriterionKind::CrauserInDyn,
    CriterionKind::CrauserOut,
    CriterionKind::CrauserOutDyn,
    CriterionKind::Oracle,
    CriterionKind::Bridge,
];

#[test]
fn test_every_criterion_matches_dijkstra() {
    for seed in 0..SEEDS {
        let g = random_graph(seed);
        let reference = dijkstra(&g, 0).unwrap();
        for kind in NON_EUCLIDEAN {
            let result = run(&g, 0, &completed(kind), &[]);
            assert_same_tree(&reference, &result, &format!("seed {seed}, {kind}"));
        }
    }
}

#[test]
fn test_in_out_union_is_complete() {
    for seed in 0..SEEDS {
        let g = random_graph(seed);
        let reference = dijkstra(&g, 0).unwrap();
        let result = run(
            &g,
            0,
            &[CriterionKind::CrauserInDyn, CriterionKind::CrauserOutDyn],
            &[],
        );
        assert_same_tree(&reference, &result, &format!("seed {seed}"));
    }
}

#[test]
fn test_heuristic_matches_dijkstra_on_euclidean_graphs() {
    for seed in 0..SEEDS {
        let (g, h) = random_euclidean_graph(seed);
        let reference = dijkstra(&g, 0).unwrap();
        let result = run(&g, 0, &completed(CriterionKind::Heuristic), &h);
        assert_same_tree(&reference, &result, &format!("seed {seed}"));
    }
}

#[test]
fn test_scenario_a_all_combinations() {
    let g = scenario_a();
    let expected_pred = [None, Some(3), Some(0), Some(2)];
    let expected_dist = [0.0, 0.9, 0.3, 0.6];
    // exact distances are admissible
    let h = expected_dist;

    let mut sets: Vec<Vec<CriterionKind>> =
        CriterionKind::ALL.into_iter().map(completed).collect();
    sets.push(vec![CriterionKind::CrauserIn, CriterionKind::CrauserOut]);
    sets.push(CriterionKind::ALL.to_vec());

    for set in sets {
        let result = run(&g, 0, &set, &h);
        for node in 0..4 {
            assert_eq!(result[node].predecessor, expected_pred[node], "{set:?} node {node}");
            assert!(approx_eq(result[node].distance, expected_dist[node]), "{set:?} node {node}");
        }
    }
}

#[test]
fn test_scenario_b_no_premature_settlement() {
    let g = scenario_b();
    let reference = dijkstra(&g, 0).unwrap();
    assert_eq!(reference[2].predecessor, Some(3));
    assert!(approx_eq(reference[2].distance, 107.0));
    assert!(reference[4].is_unexplored());
    assert!(reference[5].is_unexplored());

    for kind in NON_EUCLIDEAN {
        let result = run(&g, 0, &completed(kind), &[]);
        assert_same_tree(&reference, &result, &kind.to_string());
    }

    // threshold criteria alone must hold node 2 back until 3 has settled
    for kind in [
        CriterionKind::CrauserIn,
        CriterionKind::CrauserInDyn,
        CriterionKind::CrauserOut,
        CriterionKind::CrauserOutDyn,
        CriterionKind::Bridge,
    ] {
        let result = run(&g, 0, &[kind], &[]);
        assert_same_tree(&reference, &result, &format!("{kind} alone"));
        assert!(result[2].phase > result[3].phase, "{kind}");
    }
}

#[test]
fn test_scenario_c_complete_graph_single_phase() {
    let g = complete_graph(10);
    let h = [0.0; 10];

    for kind in CriterionKind::ALL {
        let result = run(&g, 0, &[kind], &h);
        assert_eq!(result[0].phase, Some(0));
        for node in 1..10 {
            assert_eq!(result[node].predecessor, Some(0), "{kind} node {node}");
            assert!(approx_eq(result[node].distance, 1.0), "{kind} node {node}");
        }
        let stats = PhaseStats::from_results(&result);
        if kind == CriterionKind::Dijkstra {
            // strictly sequential
            assert_eq!(stats.phases, 10);
        } else {
            assert_eq!(stats.phases, 2, "{kind}");
            assert_eq!(stats.settled_per_phase, vec![1, 9], "{kind}");
        }
    }
}

#[test]
fn test_dynamic_never_needs_more_phases_than_static() {
    let pairs = [
        (CriterionKind::CrauserIn, CriterionKind::CrauserInDyn),
        (CriterionKind::CrauserOut, CriterionKind::CrauserOutDyn),
    ];
    for seed in 0..SEEDS {
        let g = random_graph(seed);
        for (stat, dynamic) in pairs {
            let stat_phases = PhaseStats::from_results(&run(&g, 0, &[stat], &[])).phases;
            let dyn_phases = PhaseStats::from_results(&run(&g, 0, &[dynamic], &[])).phases;
            assert!(
                dyn_phases <= stat_phases,
                "seed {seed}: {dynamic} took {dyn_phases} phases, {stat} took {stat_phases}"
            );
        }
    }
}

#[test]
fn test_minimum_remaining_distance_settles_each_phase() {
    for seed in 0..SEEDS / 2 {
        let g = random_graph(seed);
        for kind in NON_EUCLIDEAN {
            let result = run(&g, 0, &completed(kind), &[]);
            let phases = PhaseStats::from_results(&result).phases as u32;
            let mut previous = f64::NEG_INFINITY;
            for phase in 0..phases {
                let settled_here = result
                    .iter()
                    .filter(|r| r.phase == Some(phase))
                    .map(|r| r.distance)
                    .fold(f64::INFINITY, f64::min);
                let remaining = result
                    .iter()
                    .filter(|r| r.phase.is_some_and(|p| p >= phase))
                    .map(|r| r.distance)
                    .fold(f64::INFINITY, f64::min);
                assert!(approx_eq(settled_here, remaining), "seed {seed}, {kind}, phase {phase}");
                assert!(settled_here >= previous, "seed {seed}, {kind}, phase {phase}");
                previous = settled_here;
            }
        }
    }
}

#[test]
fn test_phases_are_deterministic() {
    for seed in 0..10 {
        let g = random_graph(seed);
        for kind in NON_EUCLIDEAN {
            let first = run(&g, 0, &completed(kind), &[]);
            let second = run(&g, 0, &completed(kind), &[]);
            let phases = |r: &[sssp_phases_core::NodeResult]| r.iter().map(|x| x.phase).collect::<Vec<_>>();
            assert_eq!(phases(&first), phases(&second), "seed {seed}, {kind}");
        }
    }
}

#[test]
fn test_no_criterion_beats_optimal_phases() {
    for seed in 0..SEEDS / 2 {
        let g = random_graph(seed);
        let optimal = optimal_phases(&g, 0).unwrap();
        for kind in NON_EUCLIDEAN {
            let result = run(&g, 0, &completed(kind), &[]);
            for (node, (best, actual)) in optimal.iter().zip(&result).enumerate() {
                assert!(actual.phase >= best.phase, "seed {seed}, {kind}, node {node}");
            }
        }
    }
}

fn arb_graph() -> impl Strategy<Value = (Graph, NodeIndex)> {
    (2usize..24).prop_flat_map(|n| {
        (
            prop::collection::vec((0..n, 0..n, 0u32..100), 0..(n * 4)),
            0..n,
        )
            .prop_map(move |(edges, start)| {
                let mut g = Graph::with_nodes(n);
                for (source, destination, cost) in edges {
                    // duplicates and self-loops are simply skipped
                    let _ = g.try_add_edge(source, destination, f64::from(cost) / 8.0);
                }
                (g, start)
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_complete_sets_reproduce_dijkstra((g, start) in arb_graph()) {
        let reference = dijkstra(&g, start).unwrap();
        for kind in NON_EUCLIDEAN {
            let result = run(&g, start, &completed(kind), &[]);
            for (r, x) in reference.iter().zip(&result) {
                prop_assert!(approx_eq(r.distance, x.distance), "{}", kind);
                prop_assert_eq!(r.is_settled(), x.is_settled());
            }
        }
    }

    #[test]
    fn prop_optimal_phases_bound_holds_with_ties((g, start) in arb_graph()) {
        // eighth-unit costs make tied shortest paths common
        let optimal = optimal_phases(&g, start).unwrap();
        for kind in NON_EUCLIDEAN {
            let result = run(&g, start, &completed(kind), &[]);
            for (best, actual) in optimal.iter().zip(&result) {
                prop_assert!(actual.phase >= best.phase, "{}", kind);
            }
        }
    }

    #[test]
    fn prop_unreachable_nodes_have_no_phase((g, start) in arb_graph()) {
        let result = run(&g, start, &[CriterionKind::CrauserInDyn, CriterionKind::CrauserOutDyn], &[]);
        for r in &result {
            if !r.distance.is_finite() {
                prop_assert_eq!(r.predecessor, None);
                prop_assert_eq!(r.phase, None);
            } else {
                prop_assert!(r.phase.is_some());
            }
        }
    }
}
