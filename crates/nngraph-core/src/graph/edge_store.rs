//! Slot-addressed out-edge arena.
//!
//! Each slot owns one adjacency list of `(target, distance)` pairs. Slots are
//! appended as the registry allocates them and are never removed or
//! renumbered, so a slot handle stays valid for the lifetime of the store.
//! Only out-edges are indexed: in-degree is unbounded and edges pointing at a
//! deleted vertex are found lazily from the source side.

use smallvec::SmallVec;

use crate::error::{Error, Result};

use super::types::{Distance, OutEdge, Slot};

/// Inline capacity of an adjacency list before it spills to the heap.
const INLINE_DEGREE: usize = 8;

type Adjacency = SmallVec<[OutEdge; INLINE_DEGREE]>;

/// Storage for directed weighted edges keyed by source slot.
///
/// Provides O(1) access to a slot's adjacency list and O(degree) edge lookup,
/// which is cheap because out-degree is bounded by the graph's `max_degree`.
#[derive(Debug, Default, Clone)]
pub struct EdgeStore {
    /// Outgoing edges, indexed by source slot.
    outgoing: Vec<Adjacency>,
    /// Number of stored edges across all slots.
    edge_count: usize,
}

impl EdgeStore {
    /// Creates an empty store with no slots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with room for `expected_slots` adjacency lists.
    #[must_use]
    pub fn with_capacity(expected_slots: usize) -> Self {
        Self {
            outgoing: Vec::with_capacity(expected_slots),
            edge_count: 0,
        }
    }

    // ── Slots ──────────────────────────────────────────────────────────

    /// Appends an empty adjacency list for the next slot.
    pub fn push_slot(&mut self) {
        self.outgoing.push(Adjacency::new());
    }

    /// Returns the number of slots the store holds lists for.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.outgoing.len()
    }

    fn has_slot(&self, slot: Slot) -> bool {
        (slot as usize) < self.outgoing.len()
    }

    // ── Edges ──────────────────────────────────────────────────────────

    /// Adds the edge `source -> target`.
    ///
    /// No degree check is made here; bounding the out-degree is the graph's job.
    ///
    /// # Errors
    ///
    /// - `Error::UnknownVertex` if either slot has not been pushed.
    /// - `Error::EdgeAlreadyExists` if the edge is already stored.
    pub fn add_edge(&mut self, source: Slot, target: Slot, distance: Distance) -> Result<()> {
        for slot in [source, target] {
            if !self.has_slot(slot) {
                return Err(Error::UnknownVertex(slot.into()));
            }
        }
        if self.contains(source, target) {
            return Err(Error::EdgeAlreadyExists {
                from: source,
                to: target,
            });
        }

        self.outgoing[source as usize].push(OutEdge::new(target, distance));
        self.edge_count += 1;
        Ok(())
    }

    /// Returns the edge `source -> target`, if stored.
    #[must_use]
    pub fn get(&self, source: Slot, target: Slot) -> Option<&OutEdge> {
        self.outgoing(source).iter().find(|e| e.target() == target)
    }

    /// Returns true if the edge `source -> target` is stored.
    #[must_use]
    pub fn contains(&self, source: Slot, target: Slot) -> bool {
        self.get(source, target).is_some()
    }

    /// Returns the adjacency list of `source` in insertion order.
    ///
    /// Unknown slots have no edges.
    #[must_use]
    pub fn outgoing(&self, source: Slot) -> &[OutEdge] {
        self.outgoing
            .get(source as usize)
            .map(|edges| edges.as_slice())
            .unwrap_or_default()
    }

    /// Returns the out-degree of `source`.
    #[must_use]
    pub fn out_degree(&self, source: Slot) -> usize {
        self.outgoing(source).len()
    }

    /// Removes the edge `source -> target`, keeping the order of the others.
    pub fn remove_edge(&mut self, source: Slot, target: Slot) -> Option<OutEdge> {
        let edges = self.outgoing.get_mut(source as usize)?;
        let pos = edges.iter().position(|e| e.target() == target)?;
        self.edge_count -= 1;
        Some(edges.remove(pos))
    }

    /// Drops every out-edge of `source`, returning how many were removed.
    pub fn clear_outgoing(&mut self, source: Slot) -> usize {
        let Some(edges) = self.outgoing.get_mut(source as usize) else {
            return 0;
        };
        let removed = edges.len();
        edges.clear();
        self.edge_count -= removed;
        removed
    }

    /// Keeps only the out-edges of `source` for which `keep` returns true.
    ///
    /// Returns the number of removed edges.
    pub fn retain_outgoing<F>(&mut self, source: Slot, mut keep: F) -> usize
    where
        F: FnMut(&OutEdge) -> bool,
    {
        let Some(edges) = self.outgoing.get_mut(source as usize) else {
            return 0;
        };
        let before = edges.len();
        edges.retain(|e| keep(e));
        let removed = before - edges.len();
        self.edge_count -= removed;
        removed
    }

    /// Returns the total number of stored edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Iterates all edges as `(source, edge)`, by source slot then insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &OutEdge)> + '_ {
        (0..=Slot::MAX)
            .zip(&self.outgoing)
            .flat_map(|(source, edges)| edges.iter().map(move |e| (source, e)))
    }

    /// Clears all slots and edges.
    pub fn clear(&mut self) {
        self.outgoing.clear();
        self.edge_count = 0;
    }
}
