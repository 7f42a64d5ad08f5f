//! General application settings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::result::{DiffEntry, DiffResult, DiffType};
use crate::strategy::diff_properties;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_field: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_thumbnails: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_bulk_deletion: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_comments: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_duplicate_record: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_inline_record_editing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_precision: Option<NumberPrecision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_month_of_fiscal_year: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Icon {
    #[serde(rename = "type")]
    pub icon_type: String,
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberPrecision {
    pub digits: u32,
    pub decimal_places: u32,
    pub rounding_mode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsDiffEntry {
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    pub property: String,
    pub details: String,
}

impl DiffEntry for SettingsDiffEntry {
    fn diff_type(&self) -> DiffType {
        self.diff_type
    }

    fn key(&self) -> String {
        self.property.clone()
    }

    fn details(&self) -> &str {
        &self.details
    }
}

pub fn detect(local: &GeneralSettings, remote: &GeneralSettings) -> DiffResult<SettingsDiffEntry> {
    DiffResult::from_entries(diff_properties(local, remote, |property, details| {
        SettingsDiffEntry {
            diff_type: DiffType::Modified,
            property: property.to_string(),
            details,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> GeneralSettings {
        serde_yaml::from_str(
            "name: Orders\ntheme: WHITE\nenable_comments: true\nnumber_precision:\n  digits: 16\n  decimal_places: 2\n  rounding_mode: HALF_EVEN\n",
        )
        .unwrap()
    }

    #[test]
    fn identical_settings_are_empty() {
        assert!(detect(&settings(), &settings()).is_empty);
    }

    #[test]
    fn only_modified_entries_one_per_property() {
        let mut remote = settings();
        remote.theme = Some("BLUE".into());
        remote.enable_comments = None;
        remote.description = Some("old".into());
        let r = detect(&settings(), &remote);
        let props: Vec<&str> = r.entries.iter().map(|e| e.property.as_str()).collect();
        assert_eq!(props, vec!["description", "enable_comments", "theme"]);
        assert!(r.entries.iter().all(|e| e.diff_type == DiffType::Modified));
        assert_eq!(r.entries[2].details, "\"BLUE\" -> \"WHITE\"");
    }

    #[test]
    fn nested_property_is_one_entry() {
        let mut remote = settings();
        if let Some(p) = remote.number_precision.as_mut() {
            p.decimal_places = 4;
        }
        let r = detect(&settings(), &remote);
        assert_eq!(r.entries.len(), 1);
        assert_eq!(r.entries[0].property, "number_precision");
    }
}
