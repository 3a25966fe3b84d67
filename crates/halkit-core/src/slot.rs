//! Single-or-many relation slots.
//!
//! HAL lets a relation hold either one object or an array of objects. The
//! shape is significant on the wire, so the slot remembers which one was
//! used instead of normalizing everything to a list.

/// The value stored under one relation name.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationSlot<T> {
    /// Written as a JSON object.
    Single(T),
    /// Written as a JSON array. May be empty when decoded from a document.
    Many(Vec<T>),
}

impl<T> RelationSlot<T> {
    pub fn is_single(&self) -> bool {
        matches!(self, RelationSlot::Single(_))
    }

    /// The single value of this slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot is multi-valued. Use [`RelationSlot::as_single`]
    /// or [`RelationSlot::values`] when the shape is not known up front.
    pub fn single(&self) -> &T {
        match self {
            RelationSlot::Single(value) => value,
            RelationSlot::Many(_) => panic!("relation slot is multi-valued"),
        }
    }

    pub fn as_single(&self) -> Option<&T> {
        match self {
            RelationSlot::Single(value) => Some(value),
            RelationSlot::Many(_) => None,
        }
    }

    /// All values, in order. A single slot yields a one-element slice.
    pub fn values(&self) -> &[T] {
        match self {
            RelationSlot::Single(value) => std::slice::from_ref(value),
            RelationSlot::Many(values) => values,
        }
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values().iter()
    }
}

impl<'a, T> IntoIterator for &'a RelationSlot<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
