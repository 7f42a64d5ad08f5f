//! `tandem capture`: pull remote configuration into local files.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use tandem_core::Domain;
use tandem_sync::{
    pipeline, AppStatus, CaptureRunReport, LocalStore, SnapshotSource, WriteResult,
};

use super::{load_project, ScopeArgs};

/// Arguments for `tandem capture`.
#[derive(Args, Debug)]
pub struct CaptureArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Remote snapshot root (default: the project's `remote`).
    #[arg(long, value_name = "DIR")]
    pub remote: Option<PathBuf>,

    /// Show what would be written without writing any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct CaptureReportJson<'a> {
    dry_run: bool,
    #[serde(flatten)]
    report: &'a CaptureRunReport,
    writes: &'a [WriteResult],
}

#[derive(Tabled)]
struct AppRow {
    #[tabled(rename = "app")]
    app: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "domains")]
    domains: String,
    #[tabled(rename = "error")]
    error: String,
}

impl CaptureArgs {
    pub fn run(self, config: Option<&Path>) -> Result<()> {
        let scope = self
            .scope
            .scope()
            .context("provide --app <name> or use --all")?;
        let project = load_project(config)?;
        let remote = project
            .remote_root(self.remote.as_deref())
            .context("no remote snapshot root; pass --remote or set `remote` in tandem.yaml")?;

        tracing::info!("capturing from {}", remote.display());
        let mut source = SnapshotSource::new(&remote);
        let mut store = LocalStore::new(&project, self.dry_run);
        let report = pipeline::capture(&project, &scope, &Domain::ALL, &mut source, &mut store)
            .context("capture failed")?;
        let writes = store.finish().context("failed to save hash store")?;

        if self.json {
            let payload = CaptureReportJson {
                dry_run: self.dry_run,
                report: &report,
                writes: &writes,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload)
                    .context("failed to serialize capture JSON")?
            );
        } else {
            print_report(&report, &writes, self.dry_run);
        }

        if report.has_failure() {
            let failed = report
                .result
                .results
                .iter()
                .filter(|r| r.status == AppStatus::Failed)
                .count();
            bail!(
                "capture failed for {failed} of {} apps",
                report.result.results.len()
            );
        }
        Ok(())
    }
}

fn print_report(report: &CaptureRunReport, writes: &[WriteResult], dry_run: bool) {
    if report.plan.is_empty() {
        println!("No apps defined. Add apps to tandem.yaml first.");
        return;
    }

    let rows: Vec<AppRow> = report
        .result
        .results
        .iter()
        .map(|r| {
            let domains = report
                .apps
                .iter()
                .find(|a| a.app == r.name)
                .map(|a| {
                    let ok = a.domains.iter().filter(|d| d.success).count();
                    format!("{ok}/{}", a.domains.len())
                })
                .unwrap_or_else(|| "-".to_string());
            AppRow {
                app: r.name.to_string(),
                status: status_label(r.status).to_string(),
                domains,
                error: r.error.clone().unwrap_or_default(),
            }
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!("{}", outcome_line(report));

    print_writes(writes, dry_run);
}

fn print_writes(writes: &[WriteResult], dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let changed = writes
        .iter()
        .filter(|w| !matches!(w, WriteResult::Unchanged { .. }))
        .count();
    println!(
        "{prefix}{changed} written, {} unchanged",
        writes.len() - changed
    );

    for w in writes {
        match w {
            WriteResult::Written { path } => println!("  ✎  {}", path.display()),
            WriteResult::WouldWrite { path, diff } => {
                println!("  ~  {}", path.display());
                for line in diff.lines() {
                    println!("     {line}");
                }
            }
            WriteResult::Unchanged { .. } => {}
        }
    }
}

fn status_label(status: AppStatus) -> &'static str {
    match status {
        AppStatus::Succeeded => "SUCCEEDED",
        AppStatus::Failed => "FAILED",
        AppStatus::Skipped => "SKIPPED",
    }
}

fn outcome_line(report: &CaptureRunReport) -> String {
    let count = |status: AppStatus| {
        report
            .result
            .results
            .iter()
            .filter(|r| r.status == status)
            .count()
    };
    let line = format!(
        "{} succeeded, {} failed, {} skipped",
        count(AppStatus::Succeeded),
        count(AppStatus::Failed),
        count(AppStatus::Skipped)
    );
    if report.has_failure() {
        line.red().bold().to_string()
    } else {
        line.green().to_string()
    }
}
