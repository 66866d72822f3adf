//! Recursive override merging for series styles.
//!
//! Precedence is the same at every level: a value present in the override
//! replaces the base leaf, nested objects merge key by key, and keys the
//! override does not mention keep their base value.

use serde_json::{Map, Value};

pub trait MergeOverride {
    fn merge_override(&mut self, other: &Self);
}

impl<T: Clone> MergeOverride for Option<T> {
    fn merge_override(&mut self, other: &Self) {
        if other.is_some() {
            self.clone_from(other);
        }
    }
}

impl MergeOverride for Map<String, Value> {
    fn merge_override(&mut self, other: &Self) {
        for (key, value) in other {
            match self.get_mut(key) {
                Some(existing) => merge_json(existing, value),
                None => {
                    self.insert(key.clone(), value.clone());
                }
            }
        }
    }
}

/// Deep-merges `other` into `target`; objects recurse, anything else replaces.
pub fn merge_json(target: &mut Value, other: &Value) {
    match (target, other) {
        (Value::Object(target), Value::Object(other)) => target.merge_override(other),
        (target, other) => *target = other.clone(),
    }
}
