//! # `nngraph` Core
//!
//! Regular k-nearest-neighbor graph over named vertices.
//!
//! Each vertex keeps at most `k` outgoing edges to the closest candidates it
//! has been offered. Callers supply the distances; the graph only decides
//! which edges to keep.
//!
//! ## Features
//!
//! - **Bounded out-degree**: a full vertex replaces its farthest neighbor
//!   when offered a strictly closer one
//! - **Soft deletion**: deleted vertices keep their slot and can be revived;
//!   edges pointing at them are swept lazily
//! - **Text persistence**: a line-oriented format with dense renumbering of
//!   live vertices and bit-exact weights
//! - **Layered configuration**: defaults, TOML file, `NNGRAPH_*` environment
//!
//! ## Quick Start
//!
//! ```rust
//! use nngraph_core::NearestNeighborGraph;
//!
//! fn main() -> Result<(), nngraph_core::Error> {
//!     let mut graph = NearestNeighborGraph::new("samples", 2)?;
//!     graph.add_vertices(["A", "B", "C"])?;
//!
//!     graph.propose_edge("A", "B", 0.2)?;
//!     graph.propose_edge("B", "C", 0.5)?;
//!
//!     let text = graph.to_string();
//!     let restored: NearestNeighborGraph = text.parse()?;
//!     assert_eq!(restored.vertex_count(), 3);
//!     assert_eq!(restored.edge_count(), 2);
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency
//!
//! The graph is a plain single-owner value. Reads that may sweep stale edges
//! ([`NearestNeighborGraph::neighbors`]) take `&mut self`, so sharing a graph
//! across threads requires an exclusive lock around every call.

#![warn(missing_docs)]
// Clippy lints configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(
    test,
    allow(
        clippy::float_cmp,
        clippy::doc_markdown,
        clippy::uninlined_format_args
    )
)]

pub mod config;
#[cfg(test)]
mod config_tests;
pub mod error;
#[cfg(test)]
mod error_tests;
pub mod graph;
pub mod registry;
pub mod serialization;

pub use config::{ConfigError, GraphConfig};
pub use error::{Error, Result, VertexKey};
pub use graph::{Distance, EdgeStore, NearestNeighborGraph, Neighbor, OutEdge, Slot};
pub use registry::{IdentityRegistry, Registration};
