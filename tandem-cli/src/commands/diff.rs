//! `tandem diff --app <name>`: local files against the remote snapshot.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use tandem_core::Domain;
use tandem_diff::{DiffLine, DiffType};
use tandem_sync::{pipeline, DomainDiff};

use super::load_project;

/// Arguments for `tandem diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// App to diff.
    #[arg(long, value_name = "NAME")]
    pub app: String,

    /// Restrict to these domains (repeatable; default: all).
    #[arg(long = "domain", value_name = "DOMAIN")]
    pub domains: Vec<Domain>,

    /// Remote snapshot root (default: the project's `remote`).
    #[arg(long, value_name = "DIR")]
    pub remote: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct DiffReportJson<'a> {
    app: &'a str,
    remote: &'a Path,
    domains: &'a [DomainDiff],
}

impl DiffArgs {
    pub fn run(self, config: Option<&Path>) -> Result<()> {
        let project = load_project(config)?;
        let app = project.config.app(&self.app).with_context(|| {
            format!(
                "app '{}' not found in project (known apps: {})",
                self.app,
                project.config.app_names().join(", ")
            )
        })?;
        let remote = project
            .remote_root(self.remote.as_deref())
            .context("no remote snapshot root; pass --remote or set `remote` in tandem.yaml")?;
        let domains: &[Domain] = if self.domains.is_empty() {
            &Domain::ALL
        } else {
            &self.domains
        };

        tracing::info!("diffing '{}' against {}", self.app, remote.display());
        let diffs = pipeline::diff_app(&project, app, &remote, domains)
            .with_context(|| format!("diff failed for '{}'", self.app))?;

        if self.json {
            let payload = DiffReportJson {
                app: app.name.as_str(),
                remote: &remote,
                domains: &diffs,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize diff JSON")?
            );
            return Ok(());
        }

        print_diffs(app.name.as_str(), &diffs);
        Ok(())
    }
}

fn print_diffs(app: &str, diffs: &[DomainDiff]) {
    let changed: Vec<&DomainDiff> = diffs.iter().filter(|d| !d.result.is_empty).collect();
    if changed.is_empty() {
        println!("No differences for '{app}'.");
        return;
    }

    for diff in changed {
        let s = diff.result.summary;
        println!(
            "{} ({} added, {} modified, {} deleted)",
            diff.domain.to_string().bold(),
            s.added,
            s.modified,
            s.deleted
        );
        for line in &diff.result.entries {
            println!("  {}", colorize(line));
        }
    }
}

fn colorize(line: &DiffLine) -> String {
    let text = line.to_string();
    match line.diff_type {
        DiffType::Added => text.green().to_string(),
        DiffType::Modified => text.yellow().to_string(),
        DiffType::Deleted => text.red().to_string(),
    }
}
