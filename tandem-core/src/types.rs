//! Domain types for a tandem project.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! All types are serializable/deserializable via serde + serde_yaml.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProjectError;

/// Longest accepted application name.
pub const MAX_APP_NAME_LEN: usize = 64;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A validated application name, unique within a project.
///
/// Names are 1–64 characters of ASCII letters, digits, `_` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppName(String);

impl AppName {
    /// Validate `name` and wrap it.
    pub fn parse(name: impl Into<String>) -> Result<Self, ProjectError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ProjectError::InvalidAppName {
                name,
                reason: "name is empty".to_string(),
            });
        }
        if name.len() > MAX_APP_NAME_LEN {
            return Err(ProjectError::InvalidAppName {
                name,
                reason: format!("longer than {MAX_APP_NAME_LEN} characters"),
            });
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(ProjectError::InvalidAppName {
                reason: format!("unexpected character '{bad}'"),
                name,
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for AppName {
    type Error = ProjectError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl FromStr for AppName {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<AppName> for String {
    fn from(name: AppName) -> Self {
        name.0
    }
}

/// The platform-side identifier of an application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppId(pub String);

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for AppId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AppId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// One category of application configuration.
///
/// Declaration order is the capture order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    Customize,
    Schema,
    Seed,
    View,
    Settings,
    Notification,
    Report,
    Action,
    Process,
    FieldAcl,
    AppAcl,
    RecordAcl,
    AdminNotes,
    Plugin,
}

impl Domain {
    /// Every domain, in capture order.
    pub const ALL: [Domain; 14] = [
        Domain::Customize,
        Domain::Schema,
        Domain::Seed,
        Domain::View,
        Domain::Settings,
        Domain::Notification,
        Domain::Report,
        Domain::Action,
        Domain::Process,
        Domain::FieldAcl,
        Domain::AppAcl,
        Domain::RecordAcl,
        Domain::AdminNotes,
        Domain::Plugin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Customize => "customize",
            Domain::Schema => "schema",
            Domain::Seed => "seed",
            Domain::View => "view",
            Domain::Settings => "settings",
            Domain::Notification => "notification",
            Domain::Report => "report",
            Domain::Action => "action",
            Domain::Process => "process",
            Domain::FieldAcl => "field-acl",
            Domain::AppAcl => "app-acl",
            Domain::RecordAcl => "record-acl",
            Domain::AdminNotes => "admin-notes",
            Domain::Plugin => "plugin",
        }
    }

    /// Default file name for this domain inside an app directory.
    pub fn file_name(self) -> String {
        format!("{}.yaml", self.as_str())
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase().replace('_', "-");
        Domain::ALL
            .into_iter()
            .find(|d| d.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Domain::ALL.iter().map(|d| d.as_str()).collect();
                format!("unknown domain '{s}'; expected one of: {}", known.join(", "))
            })
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One managed application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppEntry {
    pub name: AppName,
    pub app_id: AppId,
    /// App directory relative to the project root. Filled in on load when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Per-domain file overrides, relative to the app directory.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub files: BTreeMap<Domain, PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<AppName>,
}

impl AppEntry {
    pub fn new(name: AppName, app_id: impl Into<AppId>) -> Self {
        Self {
            name,
            app_id: app_id.into(),
            dir: None,
            files: BTreeMap::new(),
            depends_on: Vec::new(),
        }
    }

    pub fn with_depends_on(mut self, deps: impl IntoIterator<Item = AppName>) -> Self {
        self.depends_on = deps.into_iter().collect();
        self
    }

    /// Path of the file holding `domain`, relative to the project root.
    ///
    /// Falls back to `apps/<name>` when the directory was never resolved.
    pub fn file_for(&self, domain: Domain) -> PathBuf {
        let dir = self
            .dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("apps").join(self.name.as_str()));
        match self.files.get(&domain) {
            Some(file) => dir.join(file),
            None => dir.join(domain.file_name()),
        }
    }
}

/// Root of `tandem.yaml`.
///
/// `apps` is written as a YAML mapping keyed by app name; its order is kept
/// because it breaks ties when ordering by dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub version: u32,
    /// Default remote snapshot root, relative to the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<PathBuf>,
    #[serde(default, with = "apps_map")]
    pub apps: Vec<AppEntry>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            version: 1,
            remote: None,
            apps: Vec::new(),
        }
    }
}

impl ProjectConfig {
    pub fn app(&self, name: &str) -> Option<&AppEntry> {
        self.apps.iter().find(|a| a.name.as_str() == name)
    }

    pub fn app_names(&self) -> Vec<&str> {
        self.apps.iter().map(|a| a.name.as_str()).collect()
    }
}

/// Serializes `Vec<AppEntry>` as an ordered `name: {..}` mapping.
mod apps_map {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{AppEntry, AppId, AppName, Domain};

    #[derive(Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct AppSpec {
        app_id: AppId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dir: Option<PathBuf>,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        files: BTreeMap<Domain, PathBuf>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        depends_on: Vec<AppName>,
    }

    pub fn serialize<S: Serializer>(apps: &[AppEntry], ser: S) -> Result<S::Ok, S::Error> {
        let mut map = ser.serialize_map(Some(apps.len()))?;
        for app in apps {
            let spec = AppSpec {
                app_id: app.app_id.clone(),
                dir: app.dir.clone(),
                files: app.files.clone(),
                depends_on: app.depends_on.clone(),
            };
            map.serialize_entry(app.name.as_str(), &spec)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<AppEntry>, D::Error> {
        let mapping = serde_yaml::Mapping::deserialize(de)?;
        let mut apps: Vec<AppEntry> = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let name: AppName = serde_yaml::from_value(key).map_err(D::Error::custom)?;
            if apps.iter().any(|a| a.name == name) {
                return Err(D::Error::custom(format!("duplicate app name '{name}'")));
            }
            let spec: AppSpec = serde_yaml::from_value(value)
                .map_err(|e| D::Error::custom(format!("app '{name}': {e}")))?;
            apps.push(AppEntry {
                name,
                app_id: spec.app_id,
                dir: spec.dir,
                files: spec.files,
                depends_on: spec.depends_on,
            });
        }
        Ok(apps)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
