//! Form fields and layout.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compare::same;
use crate::result::{DiffEntry, DiffResult, DiffType};
use crate::strategy::{diff_pairs, Change};

/// Key used for the single layout entry.
pub const LAYOUT_KEY: &str = "(layout)";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Field definitions by field code.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldDef>,
    /// Layout rows, kept opaque.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layout: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    #[serde(rename = "type")]
    pub field_type: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "super::is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "super::is_false")]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, FieldOption>,
    /// Type-specific properties (`defaultValue`, `lookup`, `fields` of a
    /// subtable, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDiffEntry {
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    pub field_code: String,
    pub details: String,
}

impl DiffEntry for SchemaDiffEntry {
    fn diff_type(&self) -> DiffType {
        self.diff_type
    }

    fn key(&self) -> String {
        self.field_code.clone()
    }

    fn details(&self) -> &str {
        &self.details
    }
}

pub fn detect(local: &SchemaConfig, remote: &SchemaConfig) -> DiffResult<SchemaDiffEntry> {
    let mut entries = diff_pairs(
        local.fields.iter().map(|(code, def)| (code.clone(), def)),
        remote.fields.iter().map(|(code, def)| (code.clone(), def)),
        |change| match change {
            Change::Modified { local, remote } if local.field_type != remote.field_type => {
                Some(format!(
                    "type: {} -> {} (field type change)",
                    remote.field_type, local.field_type
                ))
            }
            other => other.describe(|def| format!("{} \"{}\"", def.field_type, def.label)),
        },
        |diff_type, code, details| SchemaDiffEntry {
            diff_type,
            field_code: code.clone(),
            details,
        },
    );

    if !same(&local.layout, &remote.layout) {
        entries.push(SchemaDiffEntry {
            diff_type: DiffType::Modified,
            field_code: LAYOUT_KEY.to_string(),
            details: format!(
                "layout changed ({} rows -> {} rows)",
                remote.layout.len(),
                local.layout.len()
            ),
        });
    }

    DiffResult::from_entries(entries)
}
