//! Diff entries and their aggregate result.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a single difference, seen from local towards remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffType {
    /// Present locally, absent remotely.
    Added,
    /// Present on both sides with different content.
    Modified,
    /// Present remotely, absent locally.
    Deleted,
}

impl DiffType {
    /// Single-character marker used in reports.
    pub fn marker(self) -> char {
        match self {
            DiffType::Added => '+',
            DiffType::Modified => '~',
            DiffType::Deleted => '-',
        }
    }
}

impl fmt::Display for DiffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffType::Added => write!(f, "added"),
            DiffType::Modified => write!(f, "modified"),
            DiffType::Deleted => write!(f, "deleted"),
        }
    }
}

/// Common view over every domain's diff entry.
pub trait DiffEntry {
    fn diff_type(&self) -> DiffType;

    /// Human-readable identity of the changed item (field code, view name, ...).
    fn key(&self) -> String;

    fn details(&self) -> &str;
}

/// Counts by diff type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
    pub total: usize,
}

/// Entries plus summary. `summary.total == entries.len()` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult<E> {
    pub entries: Vec<E>,
    pub summary: DiffSummary,
    pub is_empty: bool,
}

impl<E: DiffEntry> DiffResult<E> {
    /// Count `entries` by type. Nothing is dropped, merged or reordered.
    pub fn from_entries(entries: Vec<E>) -> Self {
        let mut summary = DiffSummary::default();
        for entry in &entries {
            match entry.diff_type() {
                DiffType::Added => summary.added += 1,
                DiffType::Modified => summary.modified += 1,
                DiffType::Deleted => summary.deleted += 1,
            }
        }
        summary.total = entries.len();
        let is_empty = entries.is_empty();
        Self {
            entries,
            summary,
            is_empty,
        }
    }

    /// Flatten into domain-independent report lines.
    pub fn to_lines(&self) -> DiffResult<DiffLine> {
        DiffResult::from_entries(self.entries.iter().map(DiffLine::from_entry).collect())
    }
}

impl<E> Default for DiffResult<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            summary: DiffSummary::default(),
            is_empty: true,
        }
    }
}

/// Domain-independent report line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    pub key: String,
    pub details: String,
}

impl DiffLine {
    pub fn from_entry<E: DiffEntry>(entry: &E) -> Self {
        Self {
            diff_type: entry.diff_type(),
            key: entry.key(),
            details: entry.details().to_string(),
        }
    }
}

impl DiffEntry for DiffLine {
    fn diff_type(&self) -> DiffType {
        self.diff_type
    }

    fn key(&self) -> String {
        self.key.clone()
    }

    fn details(&self) -> &str {
        &self.details
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.diff_type.marker(), self.key)?;
        if !self.details.is_empty() {
            write!(f, ": {}", self.details)?;
        }
        Ok(())
    }
}
