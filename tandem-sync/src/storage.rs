//! Local project storage for captured documents.
//!
//! ## Write protocol
//!
//! 1. Normalise line endings.
//! 2. SHA-256 hash the content.
//! 3. Compare with the app's hash store entry → skip if identical and the
//!    file is still on disk.
//! 4. Dry-run: report a unified diff against the current file instead.
//! 5. Write to `<path>.tandem.tmp`, rename over the final path.
//! 6. Update the in-memory hash store; [`LocalStore::finish`] persists it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use similar::TextDiff;

use tandem_core::{AppEntry, AppName, Domain, Project};

use crate::capture::DomainStore;
use crate::error::{io_err, CaptureError, SyncError};
use crate::hash_store::{self, HashStore, HashStoreFile};
use crate::snapshot::{normalize_line_endings, read_or_empty};

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WriteResult {
    /// Content changed or the file did not exist.
    Written { path: PathBuf },
    /// Content matches what was last written.
    Unchanged { path: PathBuf },
    /// `--dry-run`: the file would have been written.
    WouldWrite { path: PathBuf, diff: String },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Unchanged { path }
            | WriteResult::WouldWrite { path, .. } => path,
        }
    }
}

// ---------------------------------------------------------------------------
// atomic_write
// ---------------------------------------------------------------------------

fn sha256_hex(content: &str) -> String {
    let mut h = Sha256::new();
    h.update(content.as_bytes());
    hex::encode(h.finalize())
}

/// Write `content` to `path` unless the hash store says it is already there.
///
/// `key` is the hash store key for `path`; `label` names the file in diff
/// headers.
pub(crate) fn atomic_write(
    path: &Path,
    key: &str,
    label: &str,
    content: &str,
    hashes: &mut HashStore,
    dry_run: bool,
) -> Result<WriteResult, SyncError> {
    let tmp = PathBuf::from(format!("{}.tandem.tmp", path.display()));
    atomic_write_with_tmp(path, key, label, content, hashes, dry_run, &tmp)
}

fn atomic_write_with_tmp(
    path: &Path,
    key: &str,
    label: &str,
    content: &str,
    hashes: &mut HashStore,
    dry_run: bool,
    tmp: &Path,
) -> Result<WriteResult, SyncError> {
    let normalized = normalize_line_endings(content);
    let content = normalized.as_str();
    let digest = sha256_hex(content);

    if hashes.get(key) == Some(&digest) && path.exists() {
        tracing::debug!("unchanged: {}", path.display());
        return Ok(WriteResult::Unchanged {
            path: path.to_path_buf(),
        });
    }

    if dry_run {
        let existing = read_or_empty(path)?;
        if existing == content {
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }
        let diff = TextDiff::from_lines(existing.as_str(), content)
            .unified_diff()
            .header(&format!("a/{label}"), &format!("b/{label}"))
            .context_radius(3)
            .to_string();
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
            diff,
        });
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    hashes.insert(key.to_string(), digest);
    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// LocalStore
// ---------------------------------------------------------------------------

/// [`DomainStore`] writing into the project tree.
///
/// Hash stores are loaded lazily per app and saved by [`LocalStore::finish`].
#[derive(Debug)]
pub struct LocalStore<'p> {
    project: &'p Project,
    dry_run: bool,
    started_at: DateTime<Utc>,
    stores: BTreeMap<AppName, HashStoreFile>,
    writes: Vec<WriteResult>,
}

impl<'p> LocalStore<'p> {
    pub fn new(project: &'p Project, dry_run: bool) -> Self {
        Self {
            project,
            dry_run,
            started_at: Utc::now(),
            stores: BTreeMap::new(),
            writes: Vec::new(),
        }
    }

    pub fn writes(&self) -> &[WriteResult] {
        &self.writes
    }

    fn store_for(&mut self, app: &AppName) -> Result<&mut HashStoreFile, SyncError> {
        if !self.stores.contains_key(app) {
            let loaded = hash_store::load_at(&self.project.root, app.as_str())?;
            self.stores.insert(app.clone(), loaded);
        }
        self.stores
            .get_mut(app)
            .ok_or_else(|| io_err(&self.project.root, std::io::Error::other("hash store missing")))
    }

    /// Persist every touched hash store (not in dry-run) and return the
    /// write ledger.
    pub fn finish(self) -> Result<Vec<WriteResult>, SyncError> {
        if !self.dry_run {
            for (app, mut store) in self.stores {
                store.synced_at = self.started_at;
                hash_store::save_at(&self.project.root, app.as_str(), &store)?;
            }
        }
        Ok(self.writes)
    }

    fn write(&mut self, app: &AppEntry, domain: Domain, text: &str) -> Result<WriteResult, SyncError> {
        let path = self.project.file_for(app, domain);
        let relative = path
            .strip_prefix(&self.project.root)
            .unwrap_or(path.as_path())
            .to_string_lossy()
            .replace('\\', "/");
        let dry_run = self.dry_run;
        let store = self.store_for(&app.name)?;
        atomic_write(&path, &relative, &relative, text, &mut store.files, dry_run)
    }
}

impl DomainStore for LocalStore<'_> {
    fn save(&mut self, app: &AppEntry, domain: Domain, text: &str) -> Result<(), CaptureError> {
        let result = self.write(app, domain, text)?;
        self.writes.push(result);
        Ok(())
    }
}
