//! Error types for tandem-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::AppName;

/// All errors that can arise from project file operations.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load. Includes file path and line context from serde_yaml.
    #[error("failed to parse project file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// No `tandem.yaml` at the expected location.
    #[error("project file not found at {path}")]
    ProjectNotFound { path: PathBuf },

    #[error("unsupported project file version {version} in {path} (expected 1)")]
    UnsupportedVersion { path: PathBuf, version: u32 },

    #[error("invalid app name '{name}': {reason}")]
    InvalidAppName { name: String, reason: String },
}

/// Errors from building an execution plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// Single-app mode named an app the project does not define.
    #[error("app '{name}' not found in project (known apps: {})", list_or_none(.available))]
    AppNotFound { name: String, available: Vec<String> },

    /// Some apps could not be ordered because their dependencies form a cycle.
    ///
    /// `unresolved` holds every app left unordered, in project order; `cycle`
    /// is one concrete loop, first app repeated at the end.
    #[error(
        "circular dependency detected: {} (unresolved apps: {})",
        chain(.cycle),
        list_or_none(&names(.unresolved))
    )]
    CircularDependency {
        unresolved: Vec<AppName>,
        cycle: Vec<AppName>,
    },
}

fn names(apps: &[AppName]) -> Vec<String> {
    apps.iter().map(ToString::to_string).collect()
}

fn chain(apps: &[AppName]) -> String {
    names(apps).join(" -> ")
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
