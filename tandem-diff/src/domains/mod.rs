//! Per-domain configuration models and detectors.
//!
//! Each submodule owns one domain: its serde model, its diff entry type, and
//! a `detect(local, remote)` function built on [`crate::strategy`].

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use tandem_core::Domain;

use crate::error::DiffError;
use crate::result::{DiffLine, DiffResult};

pub mod action;
pub mod admin_notes;
pub mod app_acl;
pub mod customize;
pub mod field_acl;
pub mod notification;
pub mod plugin;
pub mod process;
pub mod record_acl;
pub mod report;
pub mod schema;
pub mod seed;
pub mod settings;
pub mod view;

// ---------------------------------------------------------------------------
// Shared model pieces
// ---------------------------------------------------------------------------

/// A record query (filter condition or sort clause).
///
/// Surrounding whitespace is not significant: it is dropped on the way in
/// and on the way out.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Query(String);

impl Query {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(text.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.trim()
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Query {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let text = Option::<String>::deserialize(de)?;
        Ok(Self::new(text.unwrap_or_default()))
    }
}

/// A user, group, organization or role that a setting applies to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: String,
    /// Absent for built-in entities such as `CREATOR`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Entity {
    pub fn new(entity_type: &str, code: Option<&str>) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            code: code.map(str::to_string),
        }
    }

    /// `TYPE:code`, or just `TYPE` when there is no code.
    pub fn key(&self) -> String {
        match &self.code {
            Some(code) => format!("{}:{}", self.entity_type, code),
            None => self.entity_type.clone(),
        }
    }
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

// ---------------------------------------------------------------------------
// Text entry points
// ---------------------------------------------------------------------------

/// Parse a domain document. Blank text (a file that does not exist yet, or
/// a domain never configured remotely) is the empty configuration.
pub fn parse<T: DeserializeOwned + Default>(text: &str) -> Result<T, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    let value: serde_yaml::Value = serde_yaml::from_str(text)?;
    if value.is_null() {
        return Ok(T::default());
    }
    serde_yaml::from_value(value)
}

fn parse_pair<T: DeserializeOwned + Default>(
    domain: Domain,
    local: &str,
    remote: &str,
) -> Result<(T, T), DiffError> {
    let l = parse(local).map_err(|source| DiffError::Parse {
        domain,
        side: "local",
        source,
    })?;
    let r = parse(remote).map_err(|source| DiffError::Parse {
        domain,
        side: "remote",
        source,
    })?;
    Ok((l, r))
}

/// Parse both documents for `domain` and run that domain's detector.
pub fn detect_yaml(
    domain: Domain,
    local: &str,
    remote: &str,
) -> Result<DiffResult<DiffLine>, DiffError> {
    let lines = match domain {
        Domain::Customize => {
            let (l, r) = parse_pair(domain, local, remote)?;
            customize::detect(&l, &r).to_lines()
        }
        Domain::Schema => {
            let (l, r) = parse_pair(domain, local, remote)?;
            schema::detect(&l, &r).to_lines()
        }
        Domain::Seed => {
            let (l, r) = parse_pair(domain, local, remote)?;
            seed::detect(&l, &r).to_lines()
        }
        Domain::View => {
            let (l, r) = parse_pair(domain, local, remote)?;
            view::detect(&l, &r).to_lines()
        }
        Domain::Settings => {
            let (l, r) = parse_pair(domain, local, remote)?;
            settings::detect(&l, &r).to_lines()
        }
        Domain::Notification => {
            let (l, r) = parse_pair(domain, local, remote)?;
            notification::detect(&l, &r).to_lines()
        }
        Domain::Report => {
            let (l, r) = parse_pair(domain, local, remote)?;
            report::detect(&l, &r).to_lines()
        }
        Domain::Action => {
            let (l, r) = parse_pair(domain, local, remote)?;
            action::detect(&l, &r).to_lines()
        }
        Domain::Process => {
            let (l, r) = parse_pair(domain, local, remote)?;
            process::detect(&l, &r).to_lines()
        }
        Domain::FieldAcl => {
            let (l, r) = parse_pair(domain, local, remote)?;
            field_acl::detect(&l, &r).to_lines()
        }
        Domain::AppAcl => {
            let (l, r) = parse_pair(domain, local, remote)?;
            app_acl::detect(&l, &r).to_lines()
        }
        Domain::RecordAcl => {
            let (l, r) = parse_pair(domain, local, remote)?;
            record_acl::detect(&l, &r).to_lines()
        }
        Domain::AdminNotes => {
            let (l, r) = parse_pair(domain, local, remote)?;
            admin_notes::detect(&l, &r).to_lines()
        }
        Domain::Plugin => {
            let (l, r) = parse_pair(domain, local, remote)?;
            plugin::detect(&l, &r).to_lines()
        }
    };
    Ok(lines)
}

fn reformat<T: DeserializeOwned + Default + Serialize>(
    domain: Domain,
    text: &str,
) -> Result<String, DiffError> {
    let config: T = parse(text).map_err(|source| DiffError::Parse {
        domain,
        side: "input",
        source,
    })?;
    serde_yaml::to_string(&config).map_err(|source| DiffError::Serialize { domain, source })
}

/// Parse `text` as a `domain` document and write it back in canonical form.
pub fn normalize_yaml(domain: Domain, text: &str) -> Result<String, DiffError> {
    match domain {
        Domain::Customize => reformat::<customize::CustomizeConfig>(domain, text),
        Domain::Schema => reformat::<schema::SchemaConfig>(domain, text),
        Domain::Seed => reformat::<seed::SeedData>(domain, text),
        Domain::View => reformat::<view::ViewsConfig>(domain, text),
        Domain::Settings => reformat::<settings::GeneralSettings>(domain, text),
        Domain::Notification => reformat::<notification::NotificationConfig>(domain, text),
        Domain::Report => reformat::<report::ReportsConfig>(domain, text),
        Domain::Action => reformat::<action::ActionsConfig>(domain, text),
        Domain::Process => reformat::<process::ProcessConfig>(domain, text),
        Domain::FieldAcl => reformat::<field_acl::FieldAclConfig>(domain, text),
        Domain::AppAcl => reformat::<app_acl::AppAclConfig>(domain, text),
        Domain::RecordAcl => reformat::<record_acl::RecordAclConfig>(domain, text),
        Domain::AdminNotes => reformat::<admin_notes::AdminNotesConfig>(domain, text),
        Domain::Plugin => reformat::<plugin::PluginsConfig>(domain, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_ignores_surrounding_whitespace() {
        let a: Query = serde_yaml::from_str("'  status in (\"Open\")  '").unwrap();
        assert_eq!(a, Query::new("status in (\"Open\")"));
        assert_eq!(serde_yaml::to_string(&a).unwrap().trim(), "status in (\"Open\")");
    }

    #[test]
    fn null_query_is_empty() {
        let q: Query = serde_yaml::from_str("null").unwrap();
        assert!(q.is_empty());
    }

    #[test]
    fn entity_key() {
        assert_eq!(Entity::new("USER", Some("alice")).key(), "USER:alice");
        assert_eq!(Entity::new("CREATOR", None).key(), "CREATOR");
    }

    #[test]
    fn blank_documents_parse_as_default() {
        let v: view::ViewsConfig = parse("").unwrap();
        assert!(v.views.is_empty());
        let v: view::ViewsConfig = parse("~\n").unwrap();
        assert!(v.views.is_empty());
    }

    #[test]
    fn every_domain_dispatches_and_blank_is_identical() {
        for domain in Domain::ALL {
            let r = detect_yaml(domain, "", "").expect("detect");
            assert!(r.is_empty, "{domain} blank vs blank must be empty");
            normalize_yaml(domain, "").expect("normalize");
        }
    }

    #[test]
    fn parse_errors_name_domain_and_side() {
        let err = detect_yaml(Domain::View, "views: {}", "views: [1, 2").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("view"), "got: {msg}");
        assert!(msg.contains("remote"), "got: {msg}");
    }
}
