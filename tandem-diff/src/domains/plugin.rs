//! Installed plugins.

use serde::{Deserialize, Serialize};

use crate::result::{DiffEntry, DiffResult, DiffType};
use crate::strategy::{diff_keyed, Change};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginsConfig {
    #[serde(default)]
    pub plugins: Vec<PluginRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginRef {
    pub id: String,
    /// Display name; informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDiffEntry {
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    pub plugin_id: String,
    pub details: String,
}

impl DiffEntry for PluginDiffEntry {
    fn diff_type(&self) -> DiffType {
        self.diff_type
    }

    fn key(&self) -> String {
        self.plugin_id.clone()
    }

    fn details(&self) -> &str {
        &self.details
    }
}

pub fn detect(local: &PluginsConfig, remote: &PluginsConfig) -> DiffResult<PluginDiffEntry> {
    DiffResult::from_entries(diff_keyed(
        &local.plugins,
        &remote.plugins,
        |plugin| plugin.id.clone(),
        // Only the id matters; display names drift between environments.
        |change| match change {
            Change::Modified { .. } => None,
            other => other.describe(|p| p.name.clone().unwrap_or_default()),
        },
        |diff_type, id, details| PluginDiffEntry {
            diff_type,
            plugin_id: id.clone(),
            details,
        },
    ))
}
