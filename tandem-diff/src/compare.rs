//! Structural comparison of JSON-like trees.
//!
//! Every domain type is compared through its serde representation, so
//! "modified" always means "serializes to a different tree".

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Number, Value};

/// Longest rendering of a single value inside a details string.
const BRIEF_LIMIT: usize = 60;

/// Structural equality.
///
/// Sequences compare element-wise (length and order matter). Maps compare by
/// key set and per-key value, independent of key order. Numbers compare by
/// numeric value, so `1` equals `1.0`. Values of different kinds are never
/// equal.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(p, q)| deep_equal(p, q))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(k, v)| y.get(k).is_some_and(|w| deep_equal(v, w)))
        }
        _ => false,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Details text for a side that could not be serialized.
pub(crate) const UNSERIALIZABLE: &str = "(unserializable)";

/// Serialize `value` into a tree, or `None` (logged) when serialization
/// fails. An unserializable side is always reported as different.
pub(crate) fn to_value<T: Serialize + ?Sized>(value: &T) -> Option<Value> {
    serde_json::to_value(value)
        .map_err(|e| tracing::error!("cannot compare value: {e}"))
        .ok()
}

/// `true` when both sides serialize to equal trees.
pub fn same<T: Serialize + ?Sized>(local: &T, remote: &T) -> bool {
    match (to_value(local), to_value(remote)) {
        (Some(l), Some(r)) => deep_equal(&l, &r),
        _ => false,
    }
}

/// Describe how `remote` would change to become `local`, or `None` if they
/// are equal.
///
/// Maps are described per top-level key in sorted order
/// (`label: "Old" -> "New"; required: false -> true`), so the text does not
/// depend on field order.
pub fn describe_changes<T: Serialize + ?Sized>(local: &T, remote: &T) -> Option<String> {
    let (Some(local), Some(remote)) = (to_value(local), to_value(remote)) else {
        return Some(UNSERIALIZABLE.to_string());
    };
    if deep_equal(&local, &remote) {
        return None;
    }
    Some(describe_value_change(&local, &remote))
}

/// Like [`describe_changes`] but never looks at `ignored` top-level keys.
pub fn describe_changes_except<T: Serialize + ?Sized>(
    local: &T,
    remote: &T,
    ignored: &[&str],
) -> Option<String> {
    let (Some(mut local), Some(mut remote)) = (to_value(local), to_value(remote)) else {
        return Some(UNSERIALIZABLE.to_string());
    };
    for side in [&mut local, &mut remote] {
        if let Value::Object(map) = side {
            for key in ignored {
                map.remove(*key);
            }
        }
    }
    if deep_equal(&local, &remote) {
        return None;
    }
    Some(describe_value_change(&local, &remote))
}

fn describe_value_change(local: &Value, remote: &Value) -> String {
    match (local, remote) {
        (Value::Object(l), Value::Object(r)) => {
            let keys: BTreeSet<&String> = l.keys().chain(r.keys()).collect();
            let parts: Vec<String> = keys
                .into_iter()
                .filter_map(|key| {
                    let lv = l.get(key);
                    let rv = r.get(key);
                    let equal = match (lv, rv) {
                        (Some(a), Some(b)) => deep_equal(a, b),
                        (None, None) => true,
                        _ => false,
                    };
                    (!equal).then(|| format!("{key}: {} -> {}", brief_opt(rv), brief_opt(lv)))
                })
                .collect();
            parts.join("; ")
        }
        _ => format!("{} -> {}", brief(remote), brief(local)),
    }
}

fn brief_opt(value: Option<&Value>) -> String {
    value.map_or_else(|| "(none)".to_string(), brief)
}

/// Compact one-line rendering of `value`, truncated for display.
pub fn brief(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() <= BRIEF_LIMIT {
        return text;
    }
    let cut: String = text.chars().take(BRIEF_LIMIT).collect();
    format!("{cut}…")
}
