//! Notifications: general, per-record and reminders.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Entity, Query};
use crate::result::{DiffEntry, DiffResult, DiffType};
use crate::strategy::diff_keyed;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub general: GeneralNotifications,
    #[serde(default)]
    pub per_record: Vec<PerRecordNotification>,
    #[serde(default)]
    pub reminder: ReminderNotifications,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralNotifications {
    #[serde(default)]
    pub notify_to_commenter: bool,
    #[serde(default)]
    pub notifications: Vec<GeneralNotification>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralNotification {
    pub entity: Entity,
    #[serde(default)]
    pub include_subs: bool,
    #[serde(default)]
    pub record_added: bool,
    #[serde(default)]
    pub record_edited: bool,
    #[serde(default)]
    pub comment_added: bool,
    #[serde(default)]
    pub status_changed: bool,
    #[serde(default)]
    pub file_imported: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationTarget {
    pub entity: Entity,
    #[serde(default)]
    pub include_subs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerRecordNotification {
    pub title: String,
    #[serde(default)]
    pub filter_cond: Query,
    #[serde(default)]
    pub targets: Vec<NotificationTarget>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReminderNotifications {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default)]
    pub notifications: Vec<Reminder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub title: String,
    pub timing: ReminderTiming,
    #[serde(default)]
    pub filter_cond: Query,
    #[serde(default)]
    pub targets: Vec<NotificationTarget>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderTiming {
    /// Date or datetime field the reminder is relative to.
    pub code: String,
    #[serde(default)]
    pub days_later: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_later: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSection {
    General,
    PerRecord,
    Reminder,
}

impl fmt::Display for NotificationSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationSection::General => write!(f, "general"),
            NotificationSection::PerRecord => write!(f, "per_record"),
            NotificationSection::Reminder => write!(f, "reminder"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDiffEntry {
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    pub section: NotificationSection,
    pub name: String,
    pub details: String,
}

impl DiffEntry for NotificationDiffEntry {
    fn diff_type(&self) -> DiffType {
        self.diff_type
    }

    fn key(&self) -> String {
        format!("{}/{}", self.section, self.name)
    }

    fn details(&self) -> &str {
        &self.details
    }
}

fn entry_for(section: NotificationSection) -> impl Fn(DiffType, &String, String) -> NotificationDiffEntry {
    move |diff_type, name, details| NotificationDiffEntry {
        diff_type,
        section,
        name: name.clone(),
        details,
    }
}

fn targets_summary(targets: &[NotificationTarget]) -> String {
    format!("{} target(s)", targets.len())
}

pub fn detect(
    local: &NotificationConfig,
    remote: &NotificationConfig,
) -> DiffResult<NotificationDiffEntry> {
    let mut entries = Vec::new();

    if local.general.notify_to_commenter != remote.general.notify_to_commenter {
        entries.push(NotificationDiffEntry {
            diff_type: DiffType::Modified,
            section: NotificationSection::General,
            name: "notify_to_commenter".to_string(),
            details: format!(
                "{} -> {}",
                remote.general.notify_to_commenter, local.general.notify_to_commenter
            ),
        });
    }
    entries.extend(diff_keyed(
        &local.general.notifications,
        &remote.general.notifications,
        |n| n.entity.key(),
        |change| change.describe(|_| "general notification".to_string()),
        entry_for(NotificationSection::General),
    ));

    entries.extend(diff_keyed(
        &local.per_record,
        &remote.per_record,
        |n| n.title.clone(),
        |change| change.describe(|n| targets_summary(&n.targets)),
        entry_for(NotificationSection::PerRecord),
    ));

    if local.reminder.timezone != remote.reminder.timezone {
        let label = |tz: &Option<String>| tz.clone().unwrap_or_else(|| "(unset)".to_string());
        entries.push(NotificationDiffEntry {
            diff_type: DiffType::Modified,
            section: NotificationSection::Reminder,
            name: "timezone".to_string(),
            details: format!(
                "{} -> {}",
                label(&remote.reminder.timezone),
                label(&local.reminder.timezone)
            ),
        });
    }
    entries.extend(diff_keyed(
        &local.reminder.notifications,
        &remote.reminder.notifications,
        |n| n.title.clone(),
        |change| change.describe(|n| format!("{} ({})", targets_summary(&n.targets), n.timing.code)),
        entry_for(NotificationSection::Reminder),
    ));

    DiffResult::from_entries(entries)
}
