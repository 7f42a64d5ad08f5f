//! The three matching strategies shared by every domain detector.
//!
//! - [`diff_keyed`] / [`diff_pairs`]: items matched by key.
//! - [`diff_grouped_positional`]: items grouped by key, matched by position
//!   inside each group.
//! - [`diff_properties`]: a single document compared property by property.
//!
//! All of them report from the local point of view: local-only items are
//! [`DiffType::Added`], remote-only items are [`DiffType::Deleted`].

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;

use crate::compare::{brief, deep_equal, describe_changes, to_value, UNSERIALIZABLE};
use crate::result::DiffType;

/// One matched (or unmatched) item handed to a describe function.
#[derive(Debug)]
pub enum Change<'a, T> {
    Added(&'a T),
    Modified { local: &'a T, remote: &'a T },
    Deleted(&'a T),
}

impl<'a, T: Serialize> Change<'a, T> {
    /// Default description: `summary` for one-sided items, the per-property
    /// change list for matched ones (`None` when they are equal).
    pub fn describe(&self, summary: impl Fn(&T) -> String) -> Option<String> {
        match self {
            Change::Added(item) | Change::Deleted(item) => Some(summary(item)),
            Change::Modified { local, remote } => describe_changes(*local, *remote),
        }
    }
}

/// Match `local` and `remote` items by `key_of`.
///
/// Output order: local order for added/modified entries, then remote order
/// for deleted ones. Within one side the first item with a given key wins.
pub fn diff_keyed<'a, T, K, E>(
    local: impl IntoIterator<Item = &'a T>,
    remote: impl IntoIterator<Item = &'a T>,
    key_of: impl Fn(&T) -> K,
    describe: impl Fn(Change<'_, T>) -> Option<String>,
    entry: impl Fn(DiffType, &K, String) -> E,
) -> Vec<E>
where
    T: 'a,
    K: Ord + Clone,
{
    diff_pairs(
        local.into_iter().map(|item| (key_of(item), item)),
        remote.into_iter().map(|item| (key_of(item), item)),
        describe,
        entry,
    )
}

/// [`diff_keyed`] over items that already carry their key, such as map entries.
pub fn diff_pairs<'a, T, K, E>(
    local: impl IntoIterator<Item = (K, &'a T)>,
    remote: impl IntoIterator<Item = (K, &'a T)>,
    describe: impl Fn(Change<'_, T>) -> Option<String>,
    entry: impl Fn(DiffType, &K, String) -> E,
) -> Vec<E>
where
    T: 'a,
    K: Ord + Clone,
{
    let local = first_wins(local);
    let remote = first_wins(remote);
    let remote_index: BTreeMap<&K, &T> = remote.iter().map(|(k, item)| (k, *item)).collect();
    let local_keys: BTreeSet<&K> = local.iter().map(|(k, _)| k).collect();

    let mut out = Vec::new();
    for (key, item) in &local {
        match remote_index.get(key) {
            Some(other) => {
                if let Some(details) = describe(Change::Modified {
                    local: item,
                    remote: other,
                }) {
                    out.push(entry(DiffType::Modified, key, details));
                }
            }
            None => {
                let details = describe(Change::Added(item)).unwrap_or_default();
                out.push(entry(DiffType::Added, key, details));
            }
        }
    }
    for (key, item) in &remote {
        if !local_keys.contains(key) {
            let details = describe(Change::Deleted(item)).unwrap_or_default();
            out.push(entry(DiffType::Deleted, key, details));
        }
    }
    out
}

fn first_wins<K: Ord + Clone, V>(items: impl IntoIterator<Item = (K, V)>) -> Vec<(K, V)> {
    let mut seen = BTreeSet::new();
    items
        .into_iter()
        .filter(|(key, _)| seen.insert(key.clone()))
        .collect()
}

/// Group items by `group_of`, then match by position inside each group.
///
/// Groups are visited in first-appearance order, local side first. Moving an
/// item within its group shows up as `modified` at every shifted position.
/// `entry` receives the zero-based position inside the group.
pub fn diff_grouped_positional<T, G, E>(
    local: &[T],
    remote: &[T],
    group_of: impl Fn(&T) -> G,
    describe: impl Fn(Change<'_, T>) -> Option<String>,
    entry: impl Fn(DiffType, &G, usize, String) -> E,
) -> Vec<E>
where
    G: Ord + Clone,
{
    let mut order: Vec<G> = Vec::new();
    let mut groups: BTreeMap<G, (Vec<&T>, Vec<&T>)> = BTreeMap::new();
    for (side, items) in [(0, local), (1, remote)] {
        for item in items {
            let key = group_of(item);
            let slot = groups.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                (Vec::new(), Vec::new())
            });
            if side == 0 {
                slot.0.push(item);
            } else {
                slot.1.push(item);
            }
        }
    }

    let mut out = Vec::new();
    for key in &order {
        let Some((l, r)) = groups.get(key) else {
            continue;
        };
        for pos in 0..l.len().max(r.len()) {
            let change = match (l.get(pos), r.get(pos)) {
                (Some(a), Some(b)) => (
                    DiffType::Modified,
                    describe(Change::Modified {
                        local: a,
                        remote: b,
                    }),
                ),
                (Some(a), None) => (
                    DiffType::Added,
                    Some(describe(Change::Added(a)).unwrap_or_default()),
                ),
                (None, Some(b)) => (
                    DiffType::Deleted,
                    Some(describe(Change::Deleted(b)).unwrap_or_default()),
                ),
                (None, None) => continue,
            };
            if let (kind, Some(details)) = change {
                out.push(entry(kind, key, pos, details));
            }
        }
    }
    out
}

/// Compare two single documents property by property.
///
/// Each top-level property that differs yields one `modified` entry, in
/// property-name order. Non-map documents are compared as one `value`.
pub fn diff_properties<T: Serialize, E>(
    local: &T,
    remote: &T,
    entry: impl Fn(&str, String) -> E,
) -> Vec<E> {
    let (Some(local), Some(remote)) = (to_value(local), to_value(remote)) else {
        return vec![entry("value", UNSERIALIZABLE.to_string())];
    };
    match (&local, &remote) {
        (Value::Object(l), Value::Object(r)) => {
            let keys: BTreeSet<&String> = l.keys().chain(r.keys()).collect();
            keys.into_iter()
                .filter_map(|key| {
                    let lv = l.get(key).unwrap_or(&Value::Null);
                    let rv = r.get(key).unwrap_or(&Value::Null);
                    (!deep_equal(lv, rv))
                        .then(|| entry(key, format!("{} -> {}", brief(rv), brief(lv))))
                })
                .collect()
        }
        _ if deep_equal(&local, &remote) => Vec::new(),
        _ => vec![entry("value", format!("{} -> {}", brief(&remote), brief(&local)))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Clone, Serialize)]
    struct Item {
        key: &'static str,
        value: i32,
    }

    fn item(key: &'static str, value: i32) -> Item {
        Item { key, value }
    }

    type Out = (DiffType, String, String);

    fn keyed(local: &[Item], remote: &[Item]) -> Vec<Out> {
        diff_keyed(
            local,
            remote,
            |i| i.key,
            |c| c.describe(|i| format!("value {}", i.value)),
            |t, k, d| (t, k.to_string(), d),
        )
    }

    #[test]
    fn keyed_reports_all_three_kinds_in_order() {
        let local = [item("a", 1), item("b", 2), item("new", 0)];
        let remote = [item("gone", 9), item("b", 3), item("a", 1)];
        let out = keyed(&local, &remote);
        assert_eq!(
            out,
            vec![
                (DiffType::Modified, "b".into(), "value: 3 -> 2".into()),
                (DiffType::Added, "new".into(), "value 0".into()),
                (DiffType::Deleted, "gone".into(), "value 9".into()),
            ]
        );
    }

    #[test]
    fn keyed_ignores_order_between_keys() {
        let local = [item("a", 1), item("b", 2)];
        let remote = [item("b", 2), item("a", 1)];
        assert!(keyed(&local, &remote).is_empty());
    }

    #[test]
    fn keyed_first_duplicate_wins() {
        let local = [item("a", 1), item("a", 5)];
        let remote = [item("a", 1)];
        assert!(keyed(&local, &remote).is_empty());
    }

    fn grouped(local: &[Item], remote: &[Item]) -> Vec<(DiffType, String, usize)> {
        diff_grouped_positional(
            local,
            remote,
            |i| i.key,
            |c| c.describe(|i| i.value.to_string()),
            |t, g, pos, _| (t, g.to_string(), pos),
        )
    }

    #[test]
    fn grouped_reorder_within_group_is_modified_per_position() {
        let local = [item("g", 1), item("g", 2), item("h", 7)];
        let remote = [item("h", 7), item("g", 2), item("g", 1)];
        assert_eq!(
            grouped(&local, &remote),
            vec![
                (DiffType::Modified, "g".into(), 0),
                (DiffType::Modified, "g".into(), 1),
            ]
        );
    }

    #[test]
    fn grouped_tail_items_are_added_or_deleted() {
        let local = [item("g", 1), item("g", 2)];
        let remote = [item("g", 1), item("x", 3)];
        assert_eq!(
            grouped(&local, &remote),
            vec![
                (DiffType::Added, "g".into(), 1),
                (DiffType::Deleted, "x".into(), 0),
            ]
        );
    }

    #[test]
    fn properties_only_modify() {
        let local = item("a", 1);
        let remote = item("b", 1);
        let out = diff_properties(&local, &remote, |p, d| (p.to_string(), d));
        assert_eq!(out, vec![("key".to_string(), "\"b\" -> \"a\"".to_string())]);
        assert!(diff_properties(&local, &local, |p, _| p.to_string()).is_empty());
    }

    #[test]
    fn unserializable_singleton_is_one_modified_value() {
        let doc: BTreeMap<(i32, i32), i32> = [((1, 2), 3)].into_iter().collect();
        let out = diff_properties(&doc, &doc, |p, d| (p.to_string(), d));
        assert_eq!(out, vec![("value".to_string(), UNSERIALIZABLE.to_string())]);
    }
}
