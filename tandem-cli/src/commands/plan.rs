//! `tandem plan`: show the order apps will be processed in.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use tandem_core::{resolve_plan, PlanScope};

use super::{load_project, ScopeArgs};

/// Arguments for `tandem plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "app")]
    app: String,
    #[tabled(rename = "app id")]
    app_id: String,
    #[tabled(rename = "depends on")]
    depends_on: String,
}

impl PlanArgs {
    pub fn run(self, config: Option<&Path>) -> Result<()> {
        let project = load_project(config)?;
        let scope = self.scope.scope().unwrap_or(PlanScope::All);
        let plan = resolve_plan(&project.config, &scope).context("could not build plan")?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&plan).context("failed to serialize plan JSON")?
            );
            return Ok(());
        }

        if plan.is_empty() {
            println!("No apps defined in {}.", project.root.display());
            return Ok(());
        }

        let rows: Vec<PlanRow> = plan
            .ordered_apps
            .iter()
            .enumerate()
            .map(|(i, app)| PlanRow {
                position: i + 1,
                app: app.name.to_string(),
                app_id: app.app_id.to_string(),
                depends_on: app
                    .depends_on
                    .iter()
                    .map(|d| d.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
