//! Process management: status workflow.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Entity, Query};
use crate::result::{DiffEntry, DiffResult, DiffType};
use crate::strategy::{diff_keyed, diff_pairs};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessConfig {
    #[serde(default)]
    pub enable: bool,
    /// States by name.
    #[serde(default)]
    pub states: BTreeMap<String, ProcessState>,
    #[serde(default)]
    pub actions: Vec<ProcessAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessState {
    pub index: u32,
    #[serde(default)]
    pub assignee: Assignee,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignee {
    /// `ONE`, `ALL` or `ANY`.
    #[serde(rename = "type")]
    pub assignee_type: String,
    #[serde(default)]
    pub entities: Vec<AssigneeEntity>,
}

impl Default for Assignee {
    fn default() -> Self {
        Self {
            assignee_type: "ONE".to_string(),
            entities: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssigneeEntity {
    pub entity: Entity,
    #[serde(default)]
    pub include_subs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessAction {
    pub name: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Query::is_empty")]
    pub filter_cond: Query,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessCategory {
    Enable,
    State,
    Action,
}

impl fmt::Display for ProcessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessCategory::Enable => write!(f, "enable"),
            ProcessCategory::State => write!(f, "state"),
            ProcessCategory::Action => write!(f, "action"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDiffEntry {
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    pub category: ProcessCategory,
    pub name: String,
    pub details: String,
}

impl DiffEntry for ProcessDiffEntry {
    fn diff_type(&self) -> DiffType {
        self.diff_type
    }

    fn key(&self) -> String {
        match self.category {
            ProcessCategory::Enable => self.category.to_string(),
            _ => format!("{}/{}", self.category, self.name),
        }
    }

    fn details(&self) -> &str {
        &self.details
    }
}

pub fn detect(local: &ProcessConfig, remote: &ProcessConfig) -> DiffResult<ProcessDiffEntry> {
    let mut entries = Vec::new();

    if local.enable != remote.enable {
        entries.push(ProcessDiffEntry {
            diff_type: DiffType::Modified,
            category: ProcessCategory::Enable,
            name: "enable".to_string(),
            details: format!("{} -> {}", remote.enable, local.enable),
        });
    }

    entries.extend(diff_pairs(
        local.states.iter().map(|(name, state)| (name.clone(), state)),
        remote.states.iter().map(|(name, state)| (name.clone(), state)),
        |change| change.describe(|state| format!("assignee {}", state.assignee.assignee_type)),
        |diff_type, name, details| ProcessDiffEntry {
            diff_type,
            category: ProcessCategory::State,
            name: name.clone(),
            details,
        },
    ));

    entries.extend(diff_keyed(
        &local.actions,
        &remote.actions,
        |action| action.name.clone(),
        |change| change.describe(|action| format!("{} -> {}", action.from, action.to)),
        |diff_type, name, details| ProcessDiffEntry {
            diff_type,
            category: ProcessCategory::Action,
            name: name.clone(),
            details,
        },
    ));

    DiffResult::from_entries(entries)
}
