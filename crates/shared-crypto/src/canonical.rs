//! # Canonical JSON
//!
//! Deterministic byte encoding for hashed records. Object keys are sorted
//! lexicographically at every nesting level and the output is compact, so two
//! records with identical field values always encode to identical bytes
//! regardless of the order their fields were declared or inserted.

use crate::HashingError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Encode a record as canonical JSON bytes.
pub fn canonical_json<T: Serialize + ?Sized>(record: &T) -> Result<Vec<u8>, HashingError> {
    let value = serde_json::to_value(record)?;
    let bytes = serde_json::to_vec(&sort_keys(value))?;
    Ok(bytes)
}

/// Rebuild every object in `value` with its keys in ascending order.
///
/// `serde_json::Map` keeps insertion order when the `preserve_order` feature is
/// enabled anywhere in the dependency graph, so ordering is never left to it.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::with_capacity(entries.len());
            for (key, inner) in entries {
                sorted.insert(key, sort_keys(inner));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
