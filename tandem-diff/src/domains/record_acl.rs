//! Record permissions.
//!
//! Rules sharing a filter condition are evaluated in list order, so they are
//! matched by position inside each condition group rather than by identity.

use serde::{Deserialize, Serialize};

use super::{Entity, Query};
use crate::result::{DiffEntry, DiffResult, DiffType};
use crate::strategy::diff_grouped_positional;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordAclConfig {
    #[serde(default)]
    pub rights: Vec<RecordRight>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordRight {
    #[serde(default)]
    pub filter_cond: Query,
    #[serde(default)]
    pub entities: Vec<RecordRightEntity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordRightEntity {
    pub entity: Entity,
    #[serde(default)]
    pub viewable: bool,
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub deletable: bool,
    #[serde(default)]
    pub include_subs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordAclDiffEntry {
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    pub filter_cond: String,
    /// One-based position inside the filter condition group.
    pub index: usize,
    pub details: String,
}

impl DiffEntry for RecordAclDiffEntry {
    fn diff_type(&self) -> DiffType {
        self.diff_type
    }

    fn key(&self) -> String {
        let cond = if self.filter_cond.is_empty() {
            "(all records)"
        } else {
            self.filter_cond.as_str()
        };
        format!("{cond}#{}", self.index)
    }

    fn details(&self) -> &str {
        &self.details
    }
}

pub fn detect(local: &RecordAclConfig, remote: &RecordAclConfig) -> DiffResult<RecordAclDiffEntry> {
    DiffResult::from_entries(diff_grouped_positional(
        &local.rights,
        &remote.rights,
        |right| right.filter_cond.clone(),
        |change| {
            change.describe(|right| {
                let keys: Vec<String> = right.entities.iter().map(|e| e.entity.key()).collect();
                format!("entities: {}", keys.join(", "))
            })
        },
        |diff_type, cond, pos, details| RecordAclDiffEntry {
            diff_type,
            filter_cond: cond.as_str().to_string(),
            index: pos + 1,
            details,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn right(cond: &str, who: &str) -> RecordRight {
        RecordRight {
            filter_cond: Query::new(cond),
            entities: vec![RecordRightEntity {
                entity: Entity::new("USER", Some(who)),
                viewable: true,
                editable: false,
                deletable: false,
                include_subs: false,
            }],
        }
    }

    fn config(rights: Vec<RecordRight>) -> RecordAclConfig {
        RecordAclConfig { rights }
    }

    #[test]
    fn identical_rules_are_empty() {
        let c = config(vec![right("a = 1", "x"), right("a = 1", "y"), right("", "z")]);
        assert!(detect(&c, &c).is_empty);
    }

    #[test]
    fn reorder_within_group_is_modified_at_each_position() {
        let local = config(vec![right("a = 1", "x"), right("a = 1", "y")]);
        let remote = config(vec![right("a = 1", "y"), right("a = 1", "x")]);
        let r = detect(&local, &remote);
        let keys: Vec<String> = r.entries.iter().map(DiffEntry::key).collect();
        assert_eq!(keys, vec!["a = 1#1", "a = 1#2"]);
        assert_eq!(r.summary.modified, 2);
        assert_eq!(r.summary.total, 2);
    }

    #[test]
    fn reordering_groups_is_not_a_change() {
        let local = config(vec![right("a = 1", "x"), right("b = 2", "y")]);
        let remote = config(vec![right("b = 2", "y"), right("a = 1", "x")]);
        assert!(detect(&local, &remote).is_empty);
    }

    #[test]
    fn condition_whitespace_is_ignored() {
        let local = config(vec![right("  a = 1 ", "x")]);
        let remote = config(vec![right("a = 1", "x")]);
        assert!(detect(&local, &remote).is_empty);
    }

    #[test]
    fn extra_rules_are_added_or_deleted() {
        let local = config(vec![right("", "x"), right("", "y")]);
        let remote = config(vec![right("", "x"), right("c = 3", "z")]);
        let r = detect(&local, &remote);
        let got: Vec<(DiffType, String)> =
            r.entries.iter().map(|e| (e.diff_type, e.key())).collect();
        assert_eq!(
            got,
            vec![
                (DiffType::Added, "(all records)#2".to_string()),
                (DiffType::Deleted, "c = 3#1".to_string()),
            ]
        );
        assert_eq!(r.entries[0].details, "entities: USER:y");
    }
}
