//! Record actions (create a record in another app from this one).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Entity, Query};
use crate::result::{DiffEntry, DiffResult, DiffType};
use crate::strategy::diff_pairs;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionsConfig {
    /// Actions by name.
    #[serde(default)]
    pub actions: BTreeMap<String, ActionDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDef {
    pub index: u32,
    pub dest_app: DestApp,
    #[serde(default)]
    pub mappings: Vec<ActionMapping>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default, skip_serializing_if = "Query::is_empty")]
    pub filter_cond: Query,
}

/// Destination app, by project app name or by remote app code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestApp {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl DestApp {
    fn label(&self) -> &str {
        self.app
            .as_deref()
            .or(self.code.as_deref())
            .unwrap_or("(unknown app)")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionMapping {
    /// `FIELD` or `RECORD_URL`.
    pub src_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_field: Option<String>,
    pub dest_field: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDiffEntry {
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    pub action_name: String,
    pub details: String,
}

impl DiffEntry for ActionDiffEntry {
    fn diff_type(&self) -> DiffType {
        self.diff_type
    }

    fn key(&self) -> String {
        self.action_name.clone()
    }

    fn details(&self) -> &str {
        &self.details
    }
}

pub fn detect(local: &ActionsConfig, remote: &ActionsConfig) -> DiffResult<ActionDiffEntry> {
    DiffResult::from_entries(diff_pairs(
        local.actions.iter().map(|(name, action)| (name.clone(), action)),
        remote.actions.iter().map(|(name, action)| (name.clone(), action)),
        |change| change.describe(|action| format!("-> {}", action.dest_app.label())),
        |diff_type, name, details| ActionDiffEntry {
            diff_type,
            action_name: name.clone(),
            details,
        },
    ))
}
