pub mod capture;
pub mod diff;
pub mod init;
pub mod plan;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use tandem_core::{project, PlanScope, Project};

/// `--app <name>` / `--all` selection shared by `plan` and `capture`.
#[derive(Args, Debug)]
pub struct ScopeArgs {
    /// Only this app (its dependencies are not pulled in).
    #[arg(long, value_name = "NAME")]
    pub app: Option<String>,

    /// Every app in the project, dependency-ordered.
    #[arg(long, conflicts_with = "app")]
    pub all: bool,
}

impl ScopeArgs {
    /// `None` when neither flag was given.
    pub fn scope(&self) -> Option<PlanScope> {
        match (&self.app, self.all) {
            (Some(name), _) => Some(PlanScope::App(name.clone())),
            (None, true) => Some(PlanScope::All),
            (None, false) => None,
        }
    }
}

/// Load the project named by `--config`, or the nearest `tandem.yaml`.
pub fn load_project(config: Option<&Path>) -> Result<Project> {
    let path = match config {
        Some(path) => path.to_path_buf(),
        None => {
            let cwd = std::env::current_dir().context("could not determine current directory")?;
            project::find_project_file(&cwd)
                .context("no tandem.yaml found; run `tandem init` first")?
        }
    };
    let loaded = project::load(&path)
        .with_context(|| format!("failed to load project '{}'", path.display()))?;
    tracing::debug!(
        "loaded {} ({} apps)",
        path.display(),
        loaded.config.apps.len()
    );
    Ok(loaded)
}
