//! `tandem init [<path>] [--remote <dir>]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use tandem_core::project;

/// Write a starter project file.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project root directory.
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Default remote snapshot root, relative to the project root.
    #[arg(long, value_name = "DIR")]
    pub remote: Option<PathBuf>,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        std::fs::create_dir_all(&self.path)
            .with_context(|| format!("cannot create '{}'", self.path.display()))?;
        let existed = project::project_path_at(&self.path).exists();

        let loaded = project::init_at(&self.path, self.remote)
            .with_context(|| format!("failed to init project in '{}'", self.path.display()))?;

        let file = project::project_path_at(&loaded.root);
        if existed {
            println!(
                "✓ Project already initialized ({} apps): {}",
                loaded.config.apps.len(),
                file.display()
            );
        } else {
            println!("✓ Wrote {}", file.display());
            println!("  Add apps under `apps:` then run `tandem plan`.");
        }
        Ok(())
    }
}
