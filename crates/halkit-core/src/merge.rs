//! Recursive property merge.
//!
//! Properties are attached to a resource incrementally, and each call is
//! merged into what is already there:
//! - a key missing from the target is copied over;
//! - object into object recurses;
//! - array into array appends the source elements;
//! - anything else replaces the target value under the same key;
//! - `null` in the source never overwrites or deletes.
//!
//! Keys are matched case-insensitively at every level, the same way
//! property reads are.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::properties::{fold_index, fold_key};

/// Merge `source` into `target` in place.
pub fn merge_objects(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    let mut index = fold_index(target);
    merge_indexed(target, &mut index, source);
}

/// [`merge_objects`] with a ready folded-key index of `target`, which is
/// kept up to date.
pub(crate) fn merge_indexed(
    target: &mut Map<String, Value>,
    index: &mut HashMap<String, String>,
    source: &Map<String, Value>,
) {
    for (key, value) in source {
        if value.is_null() {
            continue;
        }

        let folded = fold_key(key);
        match index.get(folded.as_ref()).and_then(|stored| target.get_mut(stored)) {
            Some(slot) => merge_value(slot, value),
            None => {
                index.insert(folded.into_owned(), key.clone());
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Merge `source` into the value held in `slot`. The slot is owned by its
/// parent container, so a replacement stays at the same key or index.
fn merge_value(slot: &mut Value, source: &Value) {
    match (slot, source) {
        (Value::Object(target), Value::Object(source)) => merge_objects(target, source),
        (Value::Array(target), Value::Array(source)) => {
            target.extend(source.iter().filter(|v| !v.is_null()).cloned());
        }
        (slot, source) => *slot = source.clone(),
    }
}
