//! Case-insensitive, insertion-ordered property bag.

use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::merge::merge_indexed;
use crate::{EMBEDDED, LINKS};

/// Case-folded form of a property name. Case-insensitive lookups go
/// through this key.
pub(crate) fn fold_key(name: &str) -> Cow<'_, str> {
    if name.bytes().all(|b| b.is_ascii() && !b.is_ascii_uppercase()) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(name.chars().flat_map(char::to_lowercase).collect())
    }
}

/// Compare two property names ignoring case.
pub(crate) fn keys_match(a: &str, b: &str) -> bool {
    a == b || fold_key(a) == fold_key(b)
}

/// Whether `name` is `_links` or `_embedded` in any casing. Such names
/// can never be properties.
pub(crate) fn is_reserved(name: &str) -> bool {
    keys_match(name, LINKS) || keys_match(name, EMBEDDED)
}

/// Folded name → stored spelling, for every key of `values`. The first
/// spelling of a folded name wins.
pub(crate) fn fold_index(values: &Map<String, Value>) -> HashMap<String, String> {
    let mut index = HashMap::with_capacity(values.len());
    for key in values.keys() {
        index
            .entry(fold_key(key).into_owned())
            .or_insert_with(|| key.clone());
    }
    index
}

/// The free-form properties of a resource.
///
/// Reads ignore key casing; writes keep the casing and position of the
/// first insertion of a key. Each folded name maps to exactly one stored
/// key, so every lookup is a hash probe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    values: Map<String, Value>,
    index: HashMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a property, ignoring case.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .get(name)
            .or_else(|| self.values.get(self.key_of(name)?))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The stored spelling of `name`, if present.
    pub fn key_of(&self, name: &str) -> Option<&str> {
        self.index.get(fold_key(name).as_ref()).map(String::as_str)
    }

    /// Set a property verbatim. An existing key matching `name` in any case
    /// keeps its spelling and position and gets the new value.
    pub(crate) fn insert(&mut self, name: String, value: Value) {
        let folded = fold_key(&name).into_owned();
        match self.index.get(&folded) {
            Some(stored) => {
                if let Some(slot) = self.values.get_mut(stored) {
                    *slot = value;
                }
            }
            None => {
                self.index.insert(folded, name.clone());
                self.values.insert(name, value);
            }
        }
    }

    /// Merge a JSON object into the properties.
    pub(crate) fn merge(&mut self, source: &Map<String, Value>) {
        merge_indexed(&mut self.values, &mut self.index, source);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Properties in stored order.
    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.values.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
