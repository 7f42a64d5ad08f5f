//! Execution plan selection.

use serde::Serialize;

use crate::error::PlanError;
use crate::graph::resolve_order;
use crate::types::{AppEntry, ProjectConfig};

/// Apps to process, in the order they must run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionPlan {
    pub ordered_apps: Vec<AppEntry>,
}

impl ExecutionPlan {
    pub fn len(&self) -> usize {
        self.ordered_apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered_apps.is_empty()
    }

    /// Position of `name` in the plan.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.ordered_apps
            .iter()
            .position(|a| a.name.as_str() == name)
    }
}

/// Which apps a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanScope {
    /// Every app in the project, dependency-ordered.
    All,
    /// One named app. Its dependencies are not pulled in.
    App(String),
}

/// Build the plan for `scope` over the apps in `project`.
pub fn resolve_plan(project: &ProjectConfig, scope: &PlanScope) -> Result<ExecutionPlan, PlanError> {
    match scope {
        PlanScope::All => resolve_order(&project.apps),
        PlanScope::App(name) => {
            let app = project.app(name).ok_or_else(|| PlanError::AppNotFound {
                name: name.clone(),
                available: project.app_names().into_iter().map(str::to_string).collect(),
            })?;
            Ok(ExecutionPlan {
                ordered_apps: vec![app.clone()],
            })
        }
    }
}
