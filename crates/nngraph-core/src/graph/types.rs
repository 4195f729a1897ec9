//! Value types shared by the registry, the edge store and the graph engine.

use serde::{Deserialize, Serialize};

/// Stable integer handle of a vertex.
///
/// Slots are allocated sequentially from 0 and never reused, so a slot keeps
/// addressing the same name even while the vertex is deleted.
pub type Slot = u32;

/// Edge weight. Larger means less similar.
pub type Distance = f64;

/// A directed out-edge as stored in a vertex's adjacency list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutEdge {
    target: Slot,
    distance: Distance,
}

impl OutEdge {
    /// Creates an out-edge pointing at `target`.
    #[must_use]
    pub fn new(target: Slot, distance: Distance) -> Self {
        Self { target, distance }
    }

    /// Returns the target slot.
    #[must_use]
    pub fn target(&self) -> Slot {
        self.target
    }

    /// Returns the edge weight.
    #[must_use]
    pub fn distance(&self) -> Distance {
        self.distance
    }
}

/// A live neighbor returned by [`NearestNeighborGraph::neighbors`].
///
/// [`NearestNeighborGraph::neighbors`]: super::NearestNeighborGraph::neighbors
///
/// # Example
///
/// ```rust
/// use nngraph_core::graph::Neighbor;
///
/// let neighbor = Neighbor::new("sample-42", 0.25);
/// assert_eq!(neighbor.name(), "sample-42");
/// assert!((neighbor.distance() - 0.25).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    name: String,
    distance: Distance,
}

impl Neighbor {
    /// Creates a neighbor entry.
    #[must_use]
    pub fn new(name: &str, distance: Distance) -> Self {
        Self {
            name: name.to_string(),
            distance,
        }
    }

    /// Returns the neighbor's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the distance from the queried vertex.
    #[must_use]
    pub fn distance(&self) -> Distance {
        self.distance
    }
}
