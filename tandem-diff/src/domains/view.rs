//! Record list views.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Query;
use crate::result::{DiffEntry, DiffResult, DiffType};
use crate::strategy::diff_pairs;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewsConfig {
    /// Views by name.
    #[serde(default)]
    pub views: BTreeMap<String, ViewDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewDef {
    /// `LIST`, `CALENDAR` or `CUSTOM`.
    #[serde(rename = "type")]
    pub view_type: String,
    pub index: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Query::is_empty")]
    pub filter_cond: Query,
    #[serde(default, skip_serializing_if = "Query::is_empty")]
    pub sort: Query,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pager: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDiffEntry {
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    pub view_name: String,
    pub details: String,
}

impl DiffEntry for ViewDiffEntry {
    fn diff_type(&self) -> DiffType {
        self.diff_type
    }

    fn key(&self) -> String {
        self.view_name.clone()
    }

    fn details(&self) -> &str {
        &self.details
    }
}

pub fn detect(local: &ViewsConfig, remote: &ViewsConfig) -> DiffResult<ViewDiffEntry> {
    DiffResult::from_entries(diff_pairs(
        local.views.iter().map(|(name, view)| (name.clone(), view)),
        remote.views.iter().map(|(name, view)| (name.clone(), view)),
        |change| change.describe(|view| format!("{} view", view.view_type)),
        |diff_type, name, details| ViewDiffEntry {
            diff_type,
            view_name: name.clone(),
            details,
        },
    ))
}
