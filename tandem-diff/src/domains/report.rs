//! Graphs and aggregation reports.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Query;
use crate::result::{DiffEntry, DiffResult, DiffType};
use crate::strategy::diff_pairs;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Reports by name.
    #[serde(default)]
    pub reports: BTreeMap<String, ReportDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDef {
    pub chart_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_mode: Option<String>,
    pub index: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aggregations: Vec<Value>,
    #[serde(default, skip_serializing_if = "Query::is_empty")]
    pub filter_cond: Query,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periodic_report: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDiffEntry {
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    pub report_name: String,
    pub details: String,
}

impl DiffEntry for ReportDiffEntry {
    fn diff_type(&self) -> DiffType {
        self.diff_type
    }

    fn key(&self) -> String {
        self.report_name.clone()
    }

    fn details(&self) -> &str {
        &self.details
    }
}

pub fn detect(local: &ReportsConfig, remote: &ReportsConfig) -> DiffResult<ReportDiffEntry> {
    DiffResult::from_entries(diff_pairs(
        local.reports.iter().map(|(name, report)| (name.clone(), report)),
        remote.reports.iter().map(|(name, report)| (name.clone(), report)),
        |change| change.describe(|report| format!("{} chart", report.chart_type)),
        |diff_type, name, details| ReportDiffEntry {
            diff_type,
            report_name: name.clone(),
            details,
        },
    ))
}
