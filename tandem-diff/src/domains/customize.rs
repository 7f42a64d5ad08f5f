//! JavaScript / CSS customization.

use serde::{Deserialize, Serialize};

use crate::compare::same;
use crate::result::{DiffEntry, DiffResult, DiffType};
use crate::strategy::{diff_keyed, Change};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CustomizeScope {
    All,
    Admin,
    None,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomizeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<CustomizeScope>,
    #[serde(default)]
    pub desktop: PlatformResources,
    #[serde(default)]
    pub mobile: PlatformResources,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformResources {
    #[serde(default)]
    pub js: Vec<Resource>,
    #[serde(default)]
    pub css: Vec<Resource>,
}

/// One loaded resource: a remote URL or a file kept in the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Resource {
    Url { url: String },
    File { path: String },
}

impl Resource {
    pub fn identity(&self) -> &str {
        match self {
            Resource::Url { url } => url,
            Resource::File { path } => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomizeDiffEntry {
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    /// `desktop.js`, `mobile.css`, ... or `scope`.
    pub location: String,
    /// `None` for entries about the location as a whole.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    pub details: String,
}

impl DiffEntry for CustomizeDiffEntry {
    fn diff_type(&self) -> DiffType {
        self.diff_type
    }

    fn key(&self) -> String {
        match &self.resource {
            Some(resource) => format!("{}:{}", self.location, resource),
            None => self.location.clone(),
        }
    }

    fn details(&self) -> &str {
        &self.details
    }
}

pub fn detect(local: &CustomizeConfig, remote: &CustomizeConfig) -> DiffResult<CustomizeDiffEntry> {
    let mut entries = Vec::new();

    if local.scope != remote.scope {
        entries.push(CustomizeDiffEntry {
            diff_type: DiffType::Modified,
            location: "scope".to_string(),
            resource: None,
            details: format!("{} -> {}", scope_label(remote.scope), scope_label(local.scope)),
        });
    }

    let lists = [
        ("desktop.js", &local.desktop.js, &remote.desktop.js),
        ("desktop.css", &local.desktop.css, &remote.desktop.css),
        ("mobile.js", &local.mobile.js, &remote.mobile.js),
        ("mobile.css", &local.mobile.css, &remote.mobile.css),
    ];
    for (location, l, r) in lists {
        entries.extend(diff_keyed(
            l.iter(),
            r.iter(),
            |res: &Resource| res.identity().to_string(),
            |change| match change {
                Change::Added(res) | Change::Deleted(res) => Some(kind_label(res).to_string()),
                Change::Modified { local, remote } => (!same(local, remote)).then(|| {
                    format!("{} -> {}", kind_label(remote), kind_label(local))
                }),
            },
            |diff_type, resource, details| CustomizeDiffEntry {
                diff_type,
                location: location.to_string(),
                resource: Some(resource.clone()),
                details,
            },
        ));
        if load_order_changed(l, r) {
            entries.push(CustomizeDiffEntry {
                diff_type: DiffType::Modified,
                location: location.to_string(),
                resource: None,
                details: "load order changed".to_string(),
            });
        }
    }

    DiffResult::from_entries(entries)
}

fn scope_label(scope: Option<CustomizeScope>) -> &'static str {
    match scope {
        Some(CustomizeScope::All) => "ALL",
        Some(CustomizeScope::Admin) => "ADMIN",
        Some(CustomizeScope::None) => "NONE",
        None => "(unset)",
    }
}

fn kind_label(res: &Resource) -> &'static str {
    match res {
        Resource::Url { .. } => "url",
        Resource::File { .. } => "file",
    }
}

/// Resources present on both sides but loaded in a different relative order.
fn load_order_changed(local: &[Resource], remote: &[Resource]) -> bool {
    let common = |a: &[Resource], b: &[Resource]| -> Vec<String> {
        a.iter()
            .map(|r| r.identity().to_string())
            .filter(|id| b.iter().any(|o| o.identity() == id))
            .collect()
    };
    common(local, remote) != common(remote, local)
}
