//! Insertion-ordered registry of relation slots.

use std::collections::HashMap;

use tracing::trace;

use crate::error::{HalError, RelationKind, Result};
use crate::slot::RelationSlot;

/// Maps relation names to [`RelationSlot`]s, keeping insertion order so
/// documents encode their relations in the order they were added.
///
/// Relation names are matched exactly (case-sensitive).
#[derive(Debug, Clone, PartialEq)]
pub struct Relations<T> {
    kind: RelationKind,
    entries: Vec<(String, RelationSlot<T>)>,
    /// Relation name → position in `entries`.
    positions: HashMap<String, usize>,
}

impl<T> Relations<T> {
    pub(crate) fn new(kind: RelationKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    pub fn kind(&self) -> RelationKind {
        self.kind
    }

    pub fn get(&self, rel: &str) -> Option<&RelationSlot<T>> {
        self.positions
            .get(rel)
            .and_then(|&pos| self.entries.get(pos))
            .map(|(_, slot)| slot)
    }

    pub fn contains(&self, rel: &str) -> bool {
        self.positions.contains_key(rel)
    }

    /// Store a slot under `rel`.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::DuplicateRelation`] if `rel` is already present.
    pub(crate) fn insert(&mut self, rel: impl Into<String>, slot: RelationSlot<T>) -> Result<()> {
        let rel = rel.into();
        if self.contains(&rel) {
            return Err(HalError::duplicate(self.kind, &rel));
        }
        trace!(kind = %self.kind, rel = %rel, many = !slot.is_single(), "relation added");
        self.push(rel, slot);
        Ok(())
    }

    /// Append a slot for a relation the caller knows is absent.
    pub(crate) fn push_new(&mut self, rel: &str, slot: RelationSlot<T>) {
        debug_assert!(!self.contains(rel), "relation '{rel}' already present");
        self.push(rel.to_string(), slot);
    }

    fn push(&mut self, rel: String, slot: RelationSlot<T>) {
        self.positions.insert(rel.clone(), self.entries.len());
        self.entries.push((rel, slot));
    }

    /// Remove and return the slot stored under `rel`.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::NotFound`] if `rel` is absent.
    pub(crate) fn remove(&mut self, rel: &str) -> Result<RelationSlot<T>> {
        let pos = self
            .positions
            .remove(rel)
            .ok_or_else(|| HalError::not_found(self.kind, rel))?;
        for later in self.positions.values_mut().filter(|p| **p > pos) {
            *later -= 1;
        }
        trace!(kind = %self.kind, rel, "relation removed");
        Ok(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Relation names and their slots, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RelationSlot<T>)> {
        self.entries.iter().map(|(name, slot)| (name.as_str(), slot))
    }

    pub fn rels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}
