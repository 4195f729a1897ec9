//! Property-based tests for the nearest-neighbor graph.
//!
//! Random proposal and deletion sequences are replayed against the public
//! API to check the degree bound, the streaming top-k rule, lazy sweeping and
//! the text round trip.

use std::collections::BTreeSet;

use nngraph_core::NearestNeighborGraph;
use proptest::{
    collection::vec,
    prelude::{prop_assert, prop_assert_eq, Just, Strategy},
    proptest,
    test_runner::{Config as ProptestConfig, FileFailurePersistence},
};

const NNG_PROP_CASES: u32 = 256;
const NNG_PROP_MAX_SHRINK_ITERS: u32 = 2048;
const VERTEX_COUNT: usize = 10;

/// One step of a random workload.
#[derive(Debug, Clone)]
enum Op {
    Propose { from: usize, to: usize, weight: u32 },
    Remove(usize),
    Revive(usize),
}

fn nng_proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: NNG_PROP_CASES,
        max_shrink_iters: NNG_PROP_MAX_SHRINK_ITERS,
        failure_persistence: Some(Box::new(FileFailurePersistence::WithSource(
            "nng-property-regressions",
        ))),
        ..ProptestConfig::default()
    }
}

fn name(index: usize) -> String {
    format!("v{index}")
}

fn op_strategy() -> impl Strategy<Value = Op> {
    (0..VERTEX_COUNT, 0..VERTEX_COUNT, 0_u32..1000, 0_u8..10).prop_map(
        |(from, to, weight, kind)| match kind {
            0 => Op::Remove(from),
            1 => Op::Revive(from),
            _ => Op::Propose { from, to, weight },
        },
    )
}

fn build(max_degree: usize, ops: &[Op]) -> NearestNeighborGraph {
    let names: Vec<String> = (0..VERTEX_COUNT).map(name).collect();
    let mut graph = NearestNeighborGraph::with_vertices("prop", &names, max_degree).unwrap();
    for op in ops {
        match *op {
            Op::Propose { from, to, weight } => {
                graph
                    .propose_edge(&name(from), &name(to), f64::from(weight) / 8.0)
                    .unwrap();
            }
            Op::Remove(index) => graph.remove_vertex(&name(index)).unwrap(),
            Op::Revive(index) => {
                graph.add_vertex_if_new(&name(index)).unwrap();
            }
        }
    }
    graph
}

/// Distinct weights `0..n` in random order, paired with target index.
fn shuffled_weights() -> impl Strategy<Value = Vec<usize>> {
    (1..VERTEX_COUNT)
        .prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
}

proptest! {
    #![proptest_config(nng_proptest_config())]

    #[test]
    fn test_out_degree_never_exceeds_bound(
        max_degree in 1_usize..5,
        ops in vec(op_strategy(), 0..80),
    ) {
        let graph = build(max_degree, &ops);
        for index in 0..VERTEX_COUNT {
            prop_assert!(graph.out_degree(&name(index)).unwrap() <= max_degree);
        }
    }

    #[test]
    fn test_neighbors_are_live_and_not_self(
        max_degree in 1_usize..5,
        ops in vec(op_strategy(), 0..80),
    ) {
        let mut graph = build(max_degree, &ops);
        for index in 0..VERTEX_COUNT {
            let source = name(index);
            if graph.is_deleted(&source).unwrap() {
                prop_assert_eq!(graph.out_degree(&source).unwrap(), 0);
                continue;
            }
            for neighbor in graph.neighbors(&source).unwrap() {
                prop_assert!(neighbor.name() != source);
                prop_assert!(!graph.is_deleted(neighbor.name()).unwrap());
            }
        }
    }

    #[test]
    fn test_keeps_k_closest_of_distinct_proposals(
        max_degree in 1_usize..5,
        order in shuffled_weights(),
    ) {
        // Target i + 1 is offered to v0 at weight order[i].
        let names: Vec<String> = (0..VERTEX_COUNT).map(name).collect();
        let mut graph = NearestNeighborGraph::with_vertices("topk", &names, max_degree).unwrap();
        for (offset, &weight) in order.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)] // Reason: weights are below VERTEX_COUNT
            let weight = weight as f64;
            graph.propose_edge("v0", &name(offset + 1), weight).unwrap();
        }

        let mut expected: Vec<(usize, usize)> = order
            .iter()
            .enumerate()
            .map(|(offset, &weight)| (weight, offset + 1))
            .collect();
        expected.sort_unstable();
        let expected: BTreeSet<String> = expected
            .into_iter()
            .take(max_degree)
            .map(|(_, target)| name(target))
            .collect();

        let kept: BTreeSet<String> = graph
            .neighbors("v0")
            .unwrap()
            .into_iter()
            .map(|n| n.name().to_string())
            .collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn test_text_roundtrip_is_stable(
        max_degree in 1_usize..5,
        ops in vec(op_strategy(), 0..80),
    ) {
        let graph = build(max_degree, &ops);
        let text = graph.to_string();
        let restored: NearestNeighborGraph = text.parse().unwrap();

        prop_assert_eq!(restored.to_string(), text);
        prop_assert_eq!(restored.vertex_count(), graph.vertex_count());
        prop_assert_eq!(restored.total_slots(), graph.vertex_count());
    }
}
