//! Fail-fast execution of one action over an execution plan.

use std::fmt::Display;

use serde::Serialize;

use tandem_core::{AppEntry, AppName, ExecutionPlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppStatus {
    Succeeded,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppExecutionResult {
    pub name: AppName,
    pub status: AppStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MultiAppResult {
    pub results: Vec<AppExecutionResult>,
    pub has_failure: bool,
}

/// Run `action` for each app in plan order.
///
/// After the first failure every remaining app is recorded as skipped
/// without running the action, whether or not it depends on the failed one.
/// Exactly one result per planned app, in plan order.
pub fn execute_multi_app<E, F>(plan: &ExecutionPlan, mut action: F) -> MultiAppResult
where
    E: Display,
    F: FnMut(&AppEntry) -> Result<(), E>,
{
    let mut failed = false;
    let mut results = Vec::with_capacity(plan.len());

    for app in &plan.ordered_apps {
        if failed {
            tracing::info!("{}: skipped", app.name);
            results.push(AppExecutionResult {
                name: app.name.clone(),
                status: AppStatus::Skipped,
                error: None,
            });
            continue;
        }
        match action(app) {
            Ok(()) => {
                tracing::info!("{}: succeeded", app.name);
                results.push(AppExecutionResult {
                    name: app.name.clone(),
                    status: AppStatus::Succeeded,
                    error: None,
                });
            }
            Err(e) => {
                tracing::error!("{}: failed: {e}", app.name);
                failed = true;
                results.push(AppExecutionResult {
                    name: app.name.clone(),
                    status: AppStatus::Failed,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    MultiAppResult {
        results,
        has_failure: failed,
    }
}
