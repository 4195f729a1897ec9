//! Identity registry: name ↔ slot mapping with soft deletion.
//!
//! Both directions of the mapping live in one type so they cannot drift
//! apart. Slots are handed out sequentially and never reused; deleting a
//! vertex only sets its bit in the tombstone bitmap, and registering the same
//! name again clears it.

use roaring::RoaringBitmap;
use rustc_hash::FxHashMap;

use crate::error::{validate_name, Error, Result};
use crate::graph::Slot;

/// Outcome of registering a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// A fresh slot was allocated.
    Allocated(Slot),
    /// The name was deleted and has been revived in its original slot.
    Revived(Slot),
    /// The name already denotes a live vertex.
    AlreadyLive(Slot),
}

impl Registration {
    /// Returns the slot the name maps to.
    #[must_use]
    pub fn slot(self) -> Slot {
        match self {
            Self::Allocated(slot) | Self::Revived(slot) | Self::AlreadyLive(slot) => slot,
        }
    }
}

/// Bijective name ↔ slot registry plus the set of deleted slots.
#[derive(Debug, Default, Clone)]
pub struct IdentityRegistry {
    /// name -> slot.
    slots: FxHashMap<String, Slot>,
    /// slot -> name, indexed by slot.
    names: Vec<String>,
    /// Tombstones for soft-deleted slots.
    deleted: RoaringBitmap,
}

impl IdentityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with room for `expected` names.
    #[must_use]
    pub fn with_capacity(expected: usize) -> Self {
        Self {
            slots: FxHashMap::with_capacity_and_hasher(expected, Default::default()),
            names: Vec::with_capacity(expected),
            deleted: RoaringBitmap::new(),
        }
    }

    /// Returns the slot of `name`.
    ///
    /// Deleted vertices still resolve to their slot.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownVertex` if the name was never registered.
    pub fn resolve(&self, name: &str) -> Result<Slot> {
        self.slots
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownVertex(name.into()))
    }

    /// Returns the name of `slot`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownVertex` if the slot was never allocated.
    pub fn label(&self, slot: Slot) -> Result<&str> {
        self.names
            .get(slot as usize)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownVertex(slot.into()))
    }

    /// Registers `name`, reviving it if it was deleted.
    ///
    /// # Errors
    ///
    /// - `Error::DuplicateVertex` if the name already denotes a live vertex.
    /// - `Error::InvalidName` if the name cannot be persisted.
    /// - `Error::SlotSpaceExhausted` if no slot is left to allocate.
    pub fn register(&mut self, name: &str) -> Result<Slot> {
        match self.register_entry(name)? {
            Registration::AlreadyLive(_) => Err(Error::DuplicateVertex(name.to_string())),
            registration => Ok(registration.slot()),
        }
    }

    /// Registers `name` unless it already denotes a live vertex.
    ///
    /// Returns true if a slot was allocated or revived.
    ///
    /// # Errors
    ///
    /// Fails only on an invalid name or an exhausted slot space.
    pub fn register_if_absent(&mut self, name: &str) -> Result<bool> {
        Ok(!matches!(
            self.register_entry(name)?,
            Registration::AlreadyLive(_)
        ))
    }

    /// Registers `name` and reports what happened.
    ///
    /// # Errors
    ///
    /// Fails only on an invalid name or an exhausted slot space.
    pub fn register_entry(&mut self, name: &str) -> Result<Registration> {
        if let Some(&slot) = self.slots.get(name) {
            if self.deleted.remove(slot) {
                return Ok(Registration::Revived(slot));
            }
            return Ok(Registration::AlreadyLive(slot));
        }

        validate_name(name)?;
        let slot = Slot::try_from(self.names.len()).map_err(|_| Error::SlotSpaceExhausted)?;
        self.slots.insert(name.to_string(), slot);
        self.names.push(name.to_string());
        Ok(Registration::Allocated(slot))
    }

    /// Marks `slot` deleted.
    ///
    /// Returns true if the slot was live before the call.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownVertex` if the slot was never allocated.
    pub fn mark_deleted(&mut self, slot: Slot) -> Result<bool> {
        if slot as usize >= self.names.len() {
            return Err(Error::UnknownVertex(slot.into()));
        }
        Ok(self.deleted.insert(slot))
    }

    /// Returns true if `slot` is currently deleted.
    ///
    /// Slots that were never allocated are not deleted.
    #[must_use]
    pub fn is_deleted(&self, slot: Slot) -> bool {
        self.deleted.contains(slot)
    }

    /// Returns true if `slot` is allocated and not deleted.
    #[must_use]
    pub fn is_live(&self, slot: Slot) -> bool {
        (slot as usize) < self.names.len() && !self.deleted.contains(slot)
    }

    /// Returns true if the vertex named `name` is currently deleted.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownVertex` if the name was never registered.
    pub fn is_deleted_name(&self, name: &str) -> Result<bool> {
        self.resolve(name).map(|slot| self.is_deleted(slot))
    }

    /// Returns true if `name` was ever registered, deleted or not.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Returns the number of live vertices.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.total_slots() - self.deleted_count()
    }

    /// Returns the number of deleted slots.
    #[must_use]
    pub fn deleted_count(&self) -> usize {
        // Bounded by `names.len()`, which is a usize.
        usize::try_from(self.deleted.len()).unwrap_or(usize::MAX)
    }

    /// Returns the number of allocated slots, deleted ones included.
    #[must_use]
    pub fn total_slots(&self) -> usize {
        self.names.len()
    }

    /// Iterates live slots with their names in increasing slot order.
    pub fn live_slots(&self) -> impl Iterator<Item = (Slot, &str)> + '_ {
        (0..=Slot::MAX)
            .zip(&self.names)
            .filter(|(slot, _)| !self.deleted.contains(*slot))
            .map(|(slot, name)| (slot, name.as_str()))
    }
}
