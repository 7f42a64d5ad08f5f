//! Error types for tandem-sync.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use tandem_core::{PlanError, ProjectError};
use tandem_diff::DiffError;

/// All errors that can arise from pipeline operations.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("project error: {0}")]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON serialization/deserialization error (hash store).
    #[error("hash store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Diff(#[from] DiffError),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

// ---------------------------------------------------------------------------
// Capture error classification
// ---------------------------------------------------------------------------

/// What went wrong while capturing or saving one domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    BusinessRule,
    NotFound,
    Authentication,
    Authorization,
    /// The remote side could not be reached at all.
    Network,
    ExternalApi,
    /// Local storage.
    Storage,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::BusinessRule => "business rule",
            ErrorKind::NotFound => "not found",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Authorization => "authorization",
            ErrorKind::Network => "network",
            ErrorKind::ExternalApi => "external API",
            ErrorKind::Storage => "storage",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of remote-side read failures.
impl From<io::ErrorKind> for ErrorKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::PermissionDenied => ErrorKind::Authorization,
            io::ErrorKind::NotFound => ErrorKind::NotFound,
            _ => ErrorKind::Storage,
        }
    }
}

/// Whether an error stops the remaining work of its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Fatal,
    Recoverable,
}

/// Fatal kinds stop the rest of the current app's capture.
pub fn classify(kind: ErrorKind) -> Severity {
    match kind {
        ErrorKind::Authentication | ErrorKind::Authorization | ErrorKind::Network => {
            Severity::Fatal
        }
        ErrorKind::Validation
        | ErrorKind::BusinessRule
        | ErrorKind::NotFound
        | ErrorKind::ExternalApi
        | ErrorKind::Storage
        | ErrorKind::Internal => Severity::Recoverable,
    }
}

/// Error reported by a capture or save collaborator.
#[derive(Debug, Error)]
#[error("{kind} error: {message}")]
pub struct CaptureError {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CaptureError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Remote read failure on `path`, classified by the I/O error kind.
    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::new(
            ErrorKind::from(source.kind()),
            format!("{}: {}", path.display(), source),
        )
        .with_source(source)
    }

    /// Local write failure on `path`. Always [`ErrorKind::Storage`],
    /// whatever the I/O error kind.
    pub fn storage(path: &Path, source: io::Error) -> Self {
        Self::new(ErrorKind::Storage, format!("{}: {}", path.display(), source)).with_source(source)
    }

    pub fn severity(&self) -> Severity {
        classify(self.kind)
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl From<SyncError> for CaptureError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Io { path, source } => CaptureError::storage(&path, source),
            SyncError::Diff(e) => CaptureError::new(ErrorKind::Validation, e.to_string()).with_source(e),
            other => CaptureError::new(ErrorKind::Storage, other.to_string()).with_source(other),
        }
    }
}
