//! Administrator notes.

use serde::{Deserialize, Serialize};

use crate::result::{DiffEntry, DiffResult, DiffType};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminNotesConfig {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub include_in_template_and_duplicates: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminNotesDiffEntry {
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    pub field: String,
    pub details: String,
}

impl DiffEntry for AdminNotesDiffEntry {
    fn diff_type(&self) -> DiffType {
        self.diff_type
    }

    fn key(&self) -> String {
        self.field.clone()
    }

    fn details(&self) -> &str {
        &self.details
    }
}

pub fn detect(local: &AdminNotesConfig, remote: &AdminNotesConfig) -> DiffResult<AdminNotesDiffEntry> {
    let mut entries = Vec::new();
    if local.content != remote.content {
        entries.push(AdminNotesDiffEntry {
            diff_type: DiffType::Modified,
            field: "content".to_string(),
            details: format!(
                "content changed ({} -> {} lines)",
                remote.content.lines().count(),
                local.content.lines().count()
            ),
        });
    }
    if local.include_in_template_and_duplicates != remote.include_in_template_and_duplicates {
        entries.push(AdminNotesDiffEntry {
            diff_type: DiffType::Modified,
            field: "include_in_template_and_duplicates".to_string(),
            details: format!(
                "{} -> {}",
                remote.include_in_template_and_duplicates, local.include_in_template_and_duplicates
            ),
        });
    }
    DiffResult::from_entries(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(content: &str, include: bool) -> AdminNotesConfig {
        AdminNotesConfig {
            content: content.to_string(),
            include_in_template_and_duplicates: include,
        }
    }

    #[test]
    fn identical_notes_are_empty() {
        let n = notes("<p>hi</p>", true);
        assert!(detect(&n, &n).is_empty);
    }

    #[test]
    fn each_property_is_one_modified_entry() {
        let r = detect(&notes("a\nb", true), &notes("a", false));
        let fields: Vec<&str> = r.entries.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["content", "include_in_template_and_duplicates"]);
        assert_eq!(r.entries[0].details, "content changed (1 -> 2 lines)");
        assert_eq!(r.summary.modified, 2);
    }

    #[test]
    fn missing_document_against_empty_notes_is_empty() {
        let r = detect(&AdminNotesConfig::default(), &notes("", false));
        assert!(r.is_empty);
    }
}
