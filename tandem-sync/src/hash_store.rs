//! Hash store: SHA-256-based idempotency tracking for captured files.
//!
//! Persists a `HashStoreFile` JSON document per app at
//! `<project root>/.tandem/hashes/<app>.json`.
//! Writes use the same atomic `.tmp` + rename pattern as the project file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{io_err, SyncError};

/// Maps project-relative file paths to their last written SHA-256 hex digest.
pub type HashStore = BTreeMap<String, String>;

/// On-disk hash store payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashStoreFile {
    pub synced_at: DateTime<Utc>,
    #[serde(default)]
    pub files: HashStore,
}

impl HashStoreFile {
    pub fn empty() -> Self {
        Self {
            synced_at: Utc::now(),
            files: HashStore::new(),
        }
    }
}

/// `<root>/.tandem/hashes/<app>.json`. Pure, no I/O.
pub fn store_path_at(root: &Path, app: &str) -> PathBuf {
    root.join(".tandem").join("hashes").join(format!("{app}.json"))
}

/// Load the hash store for `app`, or an empty one if none exists yet.
pub fn load_at(root: &Path, app: &str) -> Result<HashStoreFile, SyncError> {
    let path = store_path_at(root, app);
    if !path.exists() {
        return Ok(HashStoreFile::empty());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Save the hash store for `app` atomically.
///
/// Writes to `<path>.tmp` then renames to `<path>`.
pub fn save_at(root: &Path, app: &str, store: &HashStoreFile) -> Result<(), SyncError> {
    let path = store_path_at(root, app);
    let Some(dir) = path.parent() else {
        return Err(io_err(
            path,
            std::io::Error::other("invalid hash store path"),
        ));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let json = serde_json::to_string_pretty(store)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}
