//! Benchmark edge proposals and text persistence.
//!
//! Run with: `cargo bench --bench propose_edge_benchmark`

#![allow(clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nngraph_core::NearestNeighborGraph;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const VERTICES: usize = 2_000;
const PROPOSALS_PER_VERTEX: usize = 64;

/// Random `(source, target, weight)` proposals over `vertices` slots.
fn generate_proposals(vertices: usize, seed: u64) -> Vec<(u32, u32, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let slots = u32::try_from(vertices).expect("benchmark vertex count fits in u32");
    (0..vertices * PROPOSALS_PER_VERTEX)
        .map(|_| (rng.gen_range(0..slots), rng.gen_range(0..slots), rng.gen::<f64>()))
        .collect()
}

fn empty_graph(vertices: usize, max_degree: usize) -> NearestNeighborGraph {
    NearestNeighborGraph::with_vertices(
        "bench",
        (0..vertices).map(|i| format!("v{i}")),
        max_degree,
    )
    .expect("benchmark graph")
}

fn filled_graph(vertices: usize, max_degree: usize) -> NearestNeighborGraph {
    let mut graph = empty_graph(vertices, max_degree);
    for (u, v, w) in generate_proposals(vertices, 7) {
        graph.propose_edge_slot(u, v, w).expect("allocated slots");
    }
    graph
}

fn bench_propose_edge(c: &mut Criterion) {
    let mut group = c.benchmark_group("propose_edge");
    let proposals = generate_proposals(VERTICES, 42);
    group.throughput(Throughput::Elements(proposals.len() as u64));

    for max_degree in [4_usize, 10, 32] {
        group.bench_with_input(
            BenchmarkId::new("stream", max_degree),
            &max_degree,
            |bencher, &max_degree| {
                bencher.iter_batched(
                    || empty_graph(VERTICES, max_degree),
                    |mut graph| {
                        for &(u, v, w) in &proposals {
                            let _ = graph.propose_edge_slot(black_box(u), black_box(v), w);
                        }
                        graph
                    },
                    criterion::BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_neighbors_after_deletions(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbors");

    for max_degree in [10_usize, 32] {
        let mut graph = filled_graph(VERTICES, max_degree);
        for slot in (0..VERTICES).step_by(10) {
            graph
                .remove_vertex(&format!("v{slot}"))
                .expect("registered vertex");
        }

        group.bench_with_input(
            BenchmarkId::new("sweep_and_collect", max_degree),
            &graph,
            |bencher, graph| {
                bencher.iter_batched(
                    || graph.clone(),
                    |mut graph| {
                        for i in (1..VERTICES).step_by(10) {
                            let _ = black_box(graph.neighbors(&format!("v{i}")));
                        }
                    },
                    criterion::BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");
    let graph = filled_graph(VERTICES, 10);
    let text = graph.to_string();
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("display", |bencher| {
        bencher.iter(|| black_box(&graph).to_string());
    });
    group.bench_function("parse", |bencher| {
        bencher.iter(|| black_box(text.as_str()).parse::<NearestNeighborGraph>());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_propose_edge,
    bench_neighbors_after_deletions,
    bench_serialization
);
criterion_main!(benches);
