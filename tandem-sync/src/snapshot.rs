//! Remote snapshot tree reader.
//!
//! A snapshot is an export of the remote environment laid out as
//! `<root>/<app_id>/<domain>.yaml`.

use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use tandem_core::{AppEntry, Domain};
use tandem_diff::normalize_yaml;

use crate::capture::DomainCapturer;
use crate::error::{io_err, CaptureError, ErrorKind, SyncError};

#[derive(Debug, Clone)]
pub struct SnapshotSource {
    root: PathBuf,
}

impl SnapshotSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn app_dir(&self, app: &AppEntry) -> PathBuf {
        self.root.join(&app.app_id.0)
    }

    pub fn path_for(&self, app: &AppEntry, domain: Domain) -> PathBuf {
        self.app_dir(app).join(domain.file_name())
    }

    /// Raw document text; empty when the remote has no such document.
    pub fn read_or_empty(&self, app: &AppEntry, domain: Domain) -> Result<String, SyncError> {
        if !self.root.is_dir() {
            return Err(io_err(
                &self.root,
                std::io::Error::new(IoErrorKind::NotFound, "remote snapshot root not found"),
            ));
        }
        read_or_empty(&self.path_for(app, domain))
    }
}

impl DomainCapturer for SnapshotSource {
    fn capture(&mut self, app: &AppEntry, domain: Domain) -> Result<String, CaptureError> {
        if !self.root.is_dir() {
            return Err(CaptureError::new(
                ErrorKind::Network,
                format!("remote snapshot {} is not reachable", self.root.display()),
            ));
        }
        let app_dir = self.app_dir(app);
        if !app_dir.is_dir() {
            return Err(CaptureError::new(
                ErrorKind::NotFound,
                format!("app {} is not present in the remote snapshot", app.app_id),
            ));
        }
        let path = app_dir.join(domain.file_name());
        let text = std::fs::read_to_string(&path).map_err(|e| CaptureError::io(&path, e))?;
        normalize_yaml(domain, &text).map_err(|e| {
            CaptureError::new(ErrorKind::Validation, format!("{}: {e}", path.display()))
                .with_source(e)
        })
    }
}

/// Read `path` with LF line endings, or an empty string if it does not exist.
pub(crate) fn read_or_empty(path: &Path) -> Result<String, SyncError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(normalize_line_endings(&content)),
        Err(err) if err.kind() == IoErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}

pub(crate) fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tandem_core::AppName;
    use tempfile::TempDir;

    fn app() -> AppEntry {
        AppEntry::new(AppName::parse("orders").unwrap(), "102")
    }

    #[test]
    fn missing_root_is_network() {
        let tmp = TempDir::new().unwrap();
        let mut src = SnapshotSource::new(tmp.path().join("nowhere"));
        let err = src.capture(&app(), Domain::View).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Network);
        assert!(err.is_fatal());
    }

    #[test]
    fn missing_app_and_missing_file_are_not_found() {
        let tmp = TempDir::new().unwrap();
        let mut src = SnapshotSource::new(tmp.path());
        let err = src.capture(&app(), Domain::View).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        fs::create_dir_all(tmp.path().join("102")).unwrap();
        let err = src.capture(&app(), Domain::View).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.message.contains("view.yaml"));
    }

    #[test]
    fn invalid_document_is_validation() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("102")).unwrap();
        fs::write(tmp.path().join("102/view.yaml"), "views: [oops").unwrap();
        let mut src = SnapshotSource::new(tmp.path());
        let err = src.capture(&app(), Domain::View).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(!err.is_fatal());
    }

    #[test]
    fn captured_text_is_normalized() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("102")).unwrap();
        fs::write(
            tmp.path().join("102/plugin.yaml"),
            "plugins:\r\n  - {id: abc,   name: Calendar}\r\n",
        )
        .unwrap();
        let mut src = SnapshotSource::new(tmp.path());
        let text = src.capture(&app(), Domain::Plugin).unwrap();
        assert_eq!(text, "plugins:\n- id: abc\n  name: Calendar\n");
    }

    #[test]
    fn read_or_empty_tolerates_missing_documents() {
        let tmp = TempDir::new().unwrap();
        let src = SnapshotSource::new(tmp.path());
        assert_eq!(src.read_or_empty(&app(), Domain::Seed).unwrap(), "");
        let gone = SnapshotSource::new(tmp.path().join("gone"));
        assert!(gone.read_or_empty(&app(), Domain::Seed).is_err());
    }
}
