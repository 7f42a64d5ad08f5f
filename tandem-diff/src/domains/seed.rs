//! Seed records.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::result::{DiffEntry, DiffResult, DiffType};
use crate::strategy::diff_pairs;

pub type Record = BTreeMap<String, Value>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    /// Field code whose value identifies a record. Records are matched by
    /// position when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default)]
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedDiffEntry {
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    pub record_key: String,
    pub details: String,
}

impl DiffEntry for SeedDiffEntry {
    fn diff_type(&self) -> DiffType {
        self.diff_type
    }

    fn key(&self) -> String {
        self.record_key.clone()
    }

    fn details(&self) -> &str {
        &self.details
    }
}

pub fn detect(local: &SeedData, remote: &SeedData) -> DiffResult<SeedDiffEntry> {
    let mut entries = Vec::new();

    if local.key != remote.key {
        entries.push(SeedDiffEntry {
            diff_type: DiffType::Modified,
            record_key: "(key)".to_string(),
            details: format!("{} -> {}", key_label(&remote.key), key_label(&local.key)),
        });
    }

    let key_field = match (&local.key, &remote.key) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.as_ref().or(b.as_ref()),
    };
    entries.extend(diff_pairs(
        keyed(&local.records, key_field),
        keyed(&remote.records, key_field),
        |change| change.describe(|record| format!("{} fields", record.len())),
        |diff_type, key, details| SeedDiffEntry {
            diff_type,
            record_key: key.to_string(),
            details,
        },
    ));

    DiffResult::from_entries(entries)
}

fn key_label(key: &Option<String>) -> &str {
    key.as_deref().unwrap_or("(position)")
}

/// Identity of a record within one side. Key values and positions never
/// match each other.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum RecordKey {
    Value(String),
    /// One-based position, used when the record has no key value.
    Position(usize),
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Value(v) => f.write_str(v),
            RecordKey::Position(n) => write!(f, "#{n}"),
        }
    }
}

fn keyed<'a>(records: &'a [Record], key_field: Option<&String>) -> Vec<(RecordKey, &'a Record)> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| (record_key(record, key_field, i), record))
        .collect()
}

fn record_key(record: &Record, key_field: Option<&String>, index: usize) -> RecordKey {
    match key_field.and_then(|field| record.get(field)) {
        Some(Value::String(s)) => RecordKey::Value(s.clone()),
        Some(Value::Null) | None => RecordKey::Position(index + 1),
        Some(other) => RecordKey::Value(other.to_string()),
    }
}
