//! Field permissions.

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::result::{DiffEntry, DiffResult, DiffType};
use crate::strategy::diff_keyed;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldAclConfig {
    #[serde(default)]
    pub rights: Vec<FieldRight>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRight {
    pub code: String,
    /// Evaluated top to bottom; order is significant.
    #[serde(default)]
    pub entities: Vec<FieldRightEntity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRightEntity {
    /// `READ`, `WRITE` or `NONE`.
    pub accessibility: String,
    pub entity: Entity,
    #[serde(default)]
    pub include_subs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAclDiffEntry {
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    pub field_code: String,
    pub details: String,
}

impl DiffEntry for FieldAclDiffEntry {
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

pub fn detect(local: &FieldAclConfig, remote: &FieldAclConfig) -> DiffResult<FieldAclDiffEntry> {
    DiffResult::from_entries(diff_keyed(
        &local.rights,
        &remote.rights,
        |right| right.code.clone(),
        |change| change.describe(|right| format!("{} entit(ies)", right.entities.len())),
        |diff_type, code, details| FieldAclDiffEntry {
            diff_type,
            field_code: code.clone(),
            details,
        },
    ))
}
