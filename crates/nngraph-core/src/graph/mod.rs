//! Degree-bounded nearest-neighbor graph engine.
//!
//! [`NearestNeighborGraph`] keeps, for every vertex, the `max_degree` closest
//! neighbors proposed so far. Vertices are addressed by name through the
//! [`IdentityRegistry`](crate::registry::IdentityRegistry) or directly by
//! [`Slot`].
//!
//! # Example
//!
//! ```rust
//! use nngraph_core::graph::NearestNeighborGraph;
//!
//! let mut graph = NearestNeighborGraph::new("samples", 2).unwrap();
//! graph.add_vertices(["A", "B", "C"]).unwrap();
//! graph.propose_edge("A", "B", 0.2).unwrap();
//! graph.propose_edge("A", "C", 0.4).unwrap();
//!
//! graph.remove_vertex("C").unwrap();
//! let neighbors = graph.neighbors("A").unwrap();
//! assert_eq!(neighbors.len(), 1);
//! assert_eq!(graph.distance("A", "B").unwrap(), Some(0.2));
//! ```

mod edge_store;
mod nng;
mod types;


pub use edge_store::EdgeStore;
pub use nng::NearestNeighborGraph;
pub use types::{Distance, Neighbor, OutEdge, Slot};
