//! Builds a k-nearest-neighbor graph over random 2-D points and saves it.
//!
//! Run with:
//!
//! ```bash
//! RUST_LOG=nngraph_core=debug cargo run --example build_graph -- --points 500 --output graph.nng
//! ```
//!
//! Configuration is read from `--config` (TOML) and `NNGRAPH_*` variables.

#![allow(clippy::cast_precision_loss)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use nngraph_core::{GraphConfig, NearestNeighborGraph};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build a nearest-neighbor graph over random points
#[derive(Parser, Debug)]
#[command(name = "build_graph")]
#[command(about, long_about = None)]
struct Args {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of random points
    #[arg(short, long, default_value_t = 200)]
    points: usize,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Delete every n-th point after building (0 disables)
    #[arg(long, default_value_t = 0)]
    delete_every: usize,

    /// Where to write the graph
    #[arg(short, long, default_value = "graph.nng")]
    output: PathBuf,
}

fn euclidean(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = GraphConfig::load(args.config.as_deref()).context("loading configuration")?;
    tracing::info!(name = %config.name, max_degree = config.max_degree, "configuration loaded");

    let mut rng = StdRng::seed_from_u64(args.seed);
    let points: Vec<(f64, f64)> = (0..args.points).map(|_| (rng.gen(), rng.gen())).collect();
    let names: Vec<String> = (0..args.points).map(|i| format!("p{i}")).collect();

    let mut graph = NearestNeighborGraph::from_config(&config)?;
    graph.add_vertices(&names)?;

    let mut accepted = 0_usize;
    for (i, &a) in points.iter().enumerate() {
        for (j, &b) in points.iter().enumerate() {
            if i != j && graph.propose_edge(&names[i], &names[j], euclidean(a, b))? {
                accepted += 1;
            }
        }
    }
    tracing::info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        accepted,
        "graph built"
    );

    if args.delete_every > 0 {
        for name in names.iter().step_by(args.delete_every) {
            graph.remove_vertex(name)?;
        }
        tracing::info!(live = graph.vertex_count(), "vertices deleted");
    }

    if let Some(first) = names.iter().find(|name| !graph.is_deleted(name).unwrap_or(true)) {
        let neighbors = graph.neighbors(first)?;
        let total: f64 = neighbors.iter().map(|n| n.distance()).sum();
        let mean = total / neighbors.len().max(1) as f64;
        tracing::info!(
            vertex = %first,
            neighbors = neighbors.len(),
            mean_distance = mean,
            "sample"
        );
    }

    graph
        .save(&args.output)
        .with_context(|| format!("saving graph to {}", args.output.display()))?;
    tracing::info!(path = %args.output.display(), "graph saved");
    Ok(())
}
