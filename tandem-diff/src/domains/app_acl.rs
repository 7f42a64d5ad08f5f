//! App permissions.

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::result::{DiffEntry, DiffResult, DiffType};
use crate::strategy::diff_keyed;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppAclConfig {
    #[serde(default)]
    pub rights: Vec<AppRight>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppRight {
    pub entity: Entity,
    #[serde(default)]
    pub include_subs: bool,
    #[serde(default)]
    pub app_editable: bool,
    #[serde(default)]
    pub record_viewable: bool,
    #[serde(default)]
    pub record_addable: bool,
    #[serde(default)]
    pub record_editable: bool,
    #[serde(default)]
    pub record_deletable: bool,
    #[serde(default)]
    pub record_importable: bool,
    #[serde(default)]
    pub record_exportable: bool,
}

impl AppRight {
    fn summary(&self) -> String {
        let flags = [
            ("app_editable", self.app_editable),
            ("view", self.record_viewable),
            ("add", self.record_addable),
            ("edit", self.record_editable),
            ("delete", self.record_deletable),
            ("import", self.record_importable),
            ("export", self.record_exportable),
        ];
        let granted: Vec<&str> = flags
            .iter()
            .filter(|(_, on)| *on)
            .map(|(name, _)| *name)
            .collect();
        if granted.is_empty() {
            "no access".to_string()
        } else {
            granted.join(", ")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppAclDiffEntry {
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    pub entity_key: String,
    pub details: String,
}

impl DiffEntry for AppAclDiffEntry {
    fn diff_type(&self) -> DiffType {
        self.diff_type
    }

    fn key(&self) -> String {
        self.entity_key.clone()
    }

    fn details(&self) -> &str {
        &self.details
    }
}

pub fn detect(local: &AppAclConfig, remote: &AppAclConfig) -> DiffResult<AppAclDiffEntry> {
    DiffResult::from_entries(diff_keyed(
        &local.rights,
        &remote.rights,
        |right| right.entity.key(),
        |change| change.describe(AppRight::summary),
        |diff_type, key, details| AppAclDiffEntry {
            diff_type,
            entity_key: key.clone(),
            details,
        },
    ))
}
