//! tandem core library: project types, project file persistence, plans.
//!
//! - [`types`]: app entries, domains, project configuration
//! - [`error`]: [`ProjectError`], [`PlanError`]
//! - [`project`]: load / save / init of `tandem.yaml`
//! - [`graph`]: dependency ordering
//! - [`plan`]: execution plan selection
//! - [`naming`]: collision-free directory names

pub mod error;
pub mod graph;
pub mod naming;
pub mod plan;
pub mod project;
pub mod types;

pub use error::{PlanError, ProjectError};
pub use graph::{resolve_order, DependencyGraph};
pub use plan::{resolve_plan, ExecutionPlan, PlanScope};
pub use project::Project;
pub use types::{AppEntry, AppId, AppName, Domain, ProjectConfig};
