//! Project file (`tandem.yaml`) load, save and init.
//!
//! # Layout
//!
//! ```text
//! <root>/
//!   tandem.yaml             (project file)
//!   apps/<app>/<domain>.yaml
//!   .tandem/hashes/<app>.json
//! ```
//!
//! # API pattern
//!
//! Functions take the project root explicitly (`_at`); tests pass a `TempDir`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::ProjectError;
use crate::naming::{next_free_name, slugify};
use crate::types::{AppEntry, Domain, ProjectConfig};

/// File name of the project file.
pub const PROJECT_FILE: &str = "tandem.yaml";

/// Supported project file version.
pub const PROJECT_VERSION: u32 = 1;

/// A loaded project: its root directory plus parsed configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub root: PathBuf,
    pub config: ProjectConfig,
}

impl Project {
    /// Absolute path of the file holding `domain` for `app`.
    pub fn file_for(&self, app: &AppEntry, domain: Domain) -> PathBuf {
        self.root.join(app.file_for(domain))
    }

    /// Remote snapshot root: `explicit` if given, else the project's `remote`,
    /// resolved against the project root.
    pub fn remote_root(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.config.remote.clone())
            .map(|p| if p.is_absolute() { p } else { self.root.join(p) })
    }
}

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<root>/tandem.yaml`. Pure, no I/O.
pub fn project_path_at(root: &Path) -> PathBuf {
    root.join(PROJECT_FILE)
}

/// Look for `tandem.yaml` in `start` and each of its ancestors.
pub fn find_project_file(start: &Path) -> Result<PathBuf, ProjectError> {
    start
        .ancestors()
        .map(project_path_at)
        .find(|p| p.is_file())
        .ok_or_else(|| ProjectError::ProjectNotFound {
            path: project_path_at(start),
        })
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load the project file at `path`. The project root is its parent directory.
///
/// Returns `ProjectError::ProjectNotFound` if absent,
/// `ProjectError::Parse` (with path + line context) if malformed YAML.
pub fn load(path: &Path) -> Result<Project, ProjectError> {
    if !path.exists() {
        return Err(ProjectError::ProjectNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    let mut config: ProjectConfig = serde_yaml::from_str(&contents).map_err(|e| {
        ProjectError::Parse {
            path: path.to_path_buf(),
            source: e,
        }
    })?;
    if config.version != PROJECT_VERSION {
        return Err(ProjectError::UnsupportedVersion {
            path: path.to_path_buf(),
            version: config.version,
        });
    }
    resolve_app_dirs(&mut config);

    let root = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(Project { root, config })
}

/// Load `<root>/tandem.yaml`.
pub fn load_at(root: &Path) -> Result<Project, ProjectError> {
    load(&project_path_at(root))
}

/// Give every app without an explicit `dir` a unique `apps/<slug>` directory.
///
/// Explicit directories are reserved first so derived ones never collide
/// with them.
pub fn resolve_app_dirs(config: &mut ProjectConfig) {
    let mut used: BTreeSet<String> = config
        .apps
        .iter()
        .filter_map(|a| a.dir.as_ref())
        .map(|d| d.to_string_lossy().into_owned())
        .collect();

    for app in config.apps.iter_mut().filter(|a| a.dir.is_none()) {
        let base = format!("apps/{}", slugify(app.name.as_str()));
        let dir = next_free_name(&base, &used);
        used.insert(dir.clone());
        app.dir = Some(PathBuf::from(dir));
    }
}

// ---------------------------------------------------------------------------
// 3. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically save `config` to `<root>/tandem.yaml`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `rename`.
pub fn save_at(root: &Path, config: &ProjectConfig) -> Result<(), ProjectError> {
    std::fs::create_dir_all(root)?;
    let path = project_path_at(root);
    let tmp_path = path.with_extension("yaml.tmp");

    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&tmp_path, yaml)?;
    std::fs::rename(&tmp_path, &path)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// 4. Init
// ---------------------------------------------------------------------------

/// Write an empty project file at `<root>/tandem.yaml`.
///
/// Idempotent: if the file already exists, loads and returns it unchanged.
pub fn init_at(root: &Path, remote: Option<PathBuf>) -> Result<Project, ProjectError> {
    let path = project_path_at(root);
    if path.exists() {
        return load(&path);
    }
    let config = ProjectConfig {
        version: PROJECT_VERSION,
        remote,
        apps: Vec::new(),
    };
    save_at(root, &config)?;
    load(&path)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
