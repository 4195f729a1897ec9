//! Regular nearest-neighbor graph.
//!
//! Every vertex keeps at most `max_degree` out-edges: the closest candidates
//! it has been offered so far. Vertices are deleted softly; a deleted
//! vertex's own out-edges go away at once while edges pointing at it are
//! swept the next time their source is traversed.
//!
//! # Exclusive access on reads
//!
//! [`NearestNeighborGraph::neighbors`] and [`NearestNeighborGraph::propose_edge`]
//! may remove stale edges while they run, so both take `&mut self`. A host
//! sharing one graph between threads must lock around them exactly as it
//! locks around writes.

use tracing::{debug, trace};

use crate::config::GraphConfig;
use crate::error::{validate_graph_name, Error, Result};
use crate::registry::{IdentityRegistry, Registration};

use super::edge_store::EdgeStore;
use super::types::{Distance, Neighbor, OutEdge, Slot};

/// Directed, degree-bounded, weighted graph over named vertices.
///
/// # Example
///
/// ```rust
/// use nngraph_core::NearestNeighborGraph;
///
/// let mut graph = NearestNeighborGraph::new("demo", 1).unwrap();
/// graph.add_vertices(["A", "B", "C", "D"]).unwrap();
///
/// assert!(graph.propose_edge("A", "B", 5.0).unwrap());
/// assert!(graph.propose_edge("A", "C", 3.0).unwrap()); // evicts A -> B
/// assert!(!graph.propose_edge("A", "D", 9.0).unwrap());
///
/// let neighbors = graph.neighbors("A").unwrap();
/// assert_eq!(neighbors.len(), 1);
/// assert_eq!(neighbors[0].name(), "C");
/// ```
#[derive(Debug, Clone)]
pub struct NearestNeighborGraph {
    /// Display name, persisted on the first line of the text form.
    name: String,
    /// Maximum out-degree (k).
    max_degree: usize,
    /// Name ↔ slot mapping and tombstones.
    registry: IdentityRegistry,
    /// Out-edges per slot.
    edges: EdgeStore,
}

impl NearestNeighborGraph {
    /// Creates an empty graph.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidName` if `name` contains a line break.
    pub fn new(name: &str, max_degree: usize) -> Result<Self> {
        validate_graph_name(name)?;
        Ok(Self {
            name: name.to_string(),
            max_degree,
            registry: IdentityRegistry::new(),
            edges: EdgeStore::new(),
        })
    }

    /// Creates a graph holding `vertices`, registered in iteration order.
    ///
    /// The first name gets slot 0, the second slot 1, and so on.
    ///
    /// # Errors
    ///
    /// Fails like [`Self::new`] and [`Self::add_vertices`].
    pub fn with_vertices<I, S>(name: &str, vertices: I, max_degree: usize) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let vertices = vertices.into_iter();
        let (expected, _) = vertices.size_hint();

        validate_graph_name(name)?;
        let mut graph = Self {
            name: name.to_string(),
            max_degree,
            registry: IdentityRegistry::with_capacity(expected),
            edges: EdgeStore::with_capacity(expected),
        };
        graph.add_vertices(vertices)?;
        Ok(graph)
    }

    /// Creates an empty graph from its configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidName` if the configured name cannot be persisted.
    pub fn from_config(config: &GraphConfig) -> Result<Self> {
        Self::new(&config.name, config.max_degree)
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the maximum out-degree.
    #[must_use]
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Returns the identity registry.
    #[must_use]
    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    pub(crate) fn edge_store(&self) -> &EdgeStore {
        &self.edges
    }

    // ── Vertices ───────────────────────────────────────────────────────

    /// Registers a vertex, reviving it if it was deleted.
    ///
    /// A revived vertex keeps its slot and starts with no out-edges.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateVertex` if `name` is already a live vertex.
    pub fn add_vertex(&mut self, name: &str) -> Result<Slot> {
        match self.register(name)? {
            Registration::AlreadyLive(_) => Err(Error::DuplicateVertex(name.to_string())),
            registration => Ok(registration.slot()),
        }
    }

    /// Registers a vertex unless it is already live.
    ///
    /// Returns true if a slot was allocated or a deleted vertex revived.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidName` for a name that cannot be persisted.
    pub fn add_vertex_if_new(&mut self, name: &str) -> Result<bool> {
        Ok(!matches!(self.register(name)?, Registration::AlreadyLive(_)))
    }

    /// Registers every name in order.
    ///
    /// Stops at the first failure; names registered before it stay registered.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateVertex` on the first name that is already live.
    pub fn add_vertices<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.add_vertex(name.as_ref())?;
        }
        Ok(())
    }

    fn register(&mut self, name: &str) -> Result<Registration> {
        let registration = self.registry.register_entry(name)?;
        if let Registration::Allocated(_) = registration {
            self.edges.push_slot();
        }
        Ok(registration)
    }

    /// Deletes the vertex named `name`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownVertex` if the name was never registered.
    pub fn remove_vertex(&mut self, name: &str) -> Result<()> {
        let slot = self.registry.resolve(name)?;
        self.remove_vertex_slot(slot)
    }

    /// Deletes the vertex in `slot` and drops its out-edges.
    ///
    /// Edges from other vertices to it stay until they are swept. Deleting an
    /// already-deleted vertex does nothing.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownVertex` if the slot was never allocated.
    pub fn remove_vertex_slot(&mut self, slot: Slot) -> Result<()> {
        if self.registry.mark_deleted(slot)? {
            let dropped = self.edges.clear_outgoing(slot);
            debug!(slot, dropped, "vertex deleted");
        }
        Ok(())
    }

    /// Returns true if the vertex named `name` is deleted.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownVertex` if the name was never registered.
    pub fn is_deleted(&self, name: &str) -> Result<bool> {
        self.registry.is_deleted_name(name)
    }

    /// Returns the slot of `name`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownVertex` if the name was never registered.
    pub fn resolve(&self, name: &str) -> Result<Slot> {
        self.registry.resolve(name)
    }

    /// Returns the name of `slot`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownVertex` if the slot was never allocated.
    pub fn label(&self, slot: Slot) -> Result<&str> {
        self.registry.label(slot)
    }

    fn resolve_pair(&self, u: &str, v: &str) -> Result<(Slot, Slot)> {
        Ok((self.registry.resolve(u)?, self.registry.resolve(v)?))
    }

    fn ensure_allocated(&self, slot: Slot) -> Result<()> {
        self.registry.label(slot).map(|_| ())
    }

    // ── Edge queries ───────────────────────────────────────────────────

    /// Returns true if the edge `u -> v` is stored.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownVertex` if either name was never registered.
    pub fn has_edge(&self, u: &str, v: &str) -> Result<bool> {
        let (u, v) = self.resolve_pair(u, v)?;
        Ok(self.has_edge_slot(u, v))
    }

    /// Returns true if the edge `u -> v` is stored.
    #[must_use]
    pub fn has_edge_slot(&self, u: Slot, v: Slot) -> bool {
        self.edges.contains(u, v)
    }

    /// Returns the weight of `u -> v`, or `None` if there is no such edge.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownVertex` if either name was never registered.
    pub fn distance(&self, u: &str, v: &str) -> Result<Option<Distance>> {
        let (u, v) = self.resolve_pair(u, v)?;
        Ok(self.distance_slot(u, v))
    }

    /// Returns the weight of `u -> v`, or `None` if there is no such edge.
    #[must_use]
    pub fn distance_slot(&self, u: Slot, v: Slot) -> Option<Distance> {
        self.edges.get(u, v).map(OutEdge::distance)
    }

    /// Returns the number of stored out-edges of `name`, unswept ones included.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownVertex` if the name was never registered.
    pub fn out_degree(&self, name: &str) -> Result<usize> {
        let slot = self.registry.resolve(name)?;
        Ok(self.edges.out_degree(slot))
    }

    /// Returns the live out-neighbors of `name` with their distances.
    ///
    /// Edges to deleted vertices met on the way are removed from the graph.
    /// Results follow the adjacency order, which depends on the insertion and
    /// eviction history.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownVertex` if the name was never registered.
    pub fn neighbors(&mut self, name: &str) -> Result<Vec<Neighbor>> {
        let slot = self.registry.resolve(name)?;
        self.sweep_stale_edges(slot);

        self.edges
            .outgoing(slot)
            .iter()
            .map(|edge| {
                let label = self.registry.label(edge.target())?;
                Ok(Neighbor::new(label, edge.distance()))
            })
            .collect()
    }

    // ── Edge updates ───────────────────────────────────────────────────

    /// Offers `v` as a neighbor of `u` at distance `weight`.
    ///
    /// Returns true if the edge was stored. See [`Self::propose_edge_slot`].
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownVertex` if either name was never registered.
    pub fn propose_edge(&mut self, u: &str, v: &str, weight: Distance) -> Result<bool> {
        let (u, v) = self.resolve_pair(u, v)?;
        self.propose_edge_slot(u, v, weight)
    }

    /// Offers `v` as a neighbor of `u` at distance `weight`.
    ///
    /// - Rejected if `u == v`, if either end is deleted, or if `u -> v` exists.
    /// - Stored unconditionally while `u` has fewer than `max_degree` out-edges.
    /// - Otherwise stored only if `weight` is strictly less than the largest
    ///   weight among `u`'s edges to live vertices, replacing that edge.
    ///   The scan drops every edge of `u` to a deleted vertex whether or not
    ///   the proposal is accepted.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownVertex` if either slot was never allocated.
    pub fn propose_edge_slot(&mut self, u: Slot, v: Slot, weight: Distance) -> Result<bool> {
        self.ensure_allocated(u)?;
        self.ensure_allocated(v)?;

        if u == v || self.registry.is_deleted(u) || self.registry.is_deleted(v) {
            return Ok(false);
        }
        if self.edges.contains(u, v) {
            return Ok(false);
        }

        if self.edges.out_degree(u) < self.max_degree {
            self.edges.add_edge(u, v, weight)?;
            return Ok(true);
        }

        let Some(farthest) = self.farthest_live_neighbor(u) else {
            return Ok(false);
        };
        if weight < farthest.distance() {
            self.edges.remove_edge(u, farthest.target());
            self.edges.add_edge(u, v, weight)?;
            trace!(
                source = u,
                evicted = farthest.target(),
                evicted_distance = farthest.distance(),
                target = v,
                distance = weight,
                "evicted farthest neighbor"
            );
            return Ok(true);
        }
        Ok(false)
    }

    /// Stores `u -> v` without eviction or degree check.
    ///
    /// Meant for rebuilding a graph that already respects its degree bound.
    ///
    /// # Errors
    ///
    /// - `Error::UnknownVertex` if either name was never registered.
    /// - `Error::EdgeAlreadyExists` if `u -> v` is already stored.
    pub fn add_edge(&mut self, u: &str, v: &str, weight: Distance) -> Result<()> {
        let (u, v) = self.resolve_pair(u, v)?;
        self.add_edge_slot(u, v, weight)
    }

    /// Stores `u -> v` without eviction or degree check.
    ///
    /// # Errors
    ///
    /// - `Error::UnknownVertex` if either slot was never allocated.
    /// - `Error::EdgeAlreadyExists` if `u -> v` is already stored.
    pub fn add_edge_slot(&mut self, u: Slot, v: Slot, weight: Distance) -> Result<()> {
        self.edges.add_edge(u, v, weight)
    }

    /// Drops every out-edge of `slot` whose target is deleted.
    fn sweep_stale_edges(&mut self, slot: Slot) -> usize {
        let registry = &self.registry;
        let swept = self
            .edges
            .retain_outgoing(slot, |edge| !registry.is_deleted(edge.target()));
        if swept > 0 {
            trace!(source = slot, swept, "swept edges to deleted vertices");
        }
        swept
    }

    /// Sweeps stale edges of `slot`, then returns its farthest live out-edge.
    ///
    /// Ties keep the edge met first.
    fn farthest_live_neighbor(&mut self, slot: Slot) -> Option<OutEdge> {
        self.sweep_stale_edges(slot);
        self.edges
            .outgoing(slot)
            .iter()
            .fold(None, |farthest: Option<OutEdge>, edge| match farthest {
                Some(current) if edge.distance() <= current.distance() => Some(current),
                _ => Some(*edge),
            })
    }

    // ── Counts ─────────────────────────────────────────────────────────

    /// Returns the number of stored edges, including unswept edges to deleted vertices.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.edge_count()
    }

    /// Returns the number of live vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.registry.live_count()
    }

    /// Returns the number of allocated slots, deleted vertices included.
    #[must_use]
    pub fn total_slots(&self) -> usize {
        self.registry.total_slots()
    }
}
