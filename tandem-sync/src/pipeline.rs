//! Shared pipeline entrypoints used by the CLI.

use std::path::Path;

use serde::Serialize;

use tandem_core::{resolve_plan, AppEntry, AppName, Domain, PlanScope, Project};
use tandem_diff::{detect_yaml, DiffLine, DiffResult};

use crate::capture::{
    capture_app, first_failure, skipped_app, CaptureResult, DomainCapturer, DomainStore,
};
use crate::executor::{execute_multi_app, AppStatus, MultiAppResult};
use crate::snapshot::{read_or_empty, SnapshotSource};
use crate::SyncError;

/// Capture ledger for one app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppCaptureReport {
    pub app: AppName,
    pub domains: Vec<CaptureResult>,
}

/// Everything a capture run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureRunReport {
    /// App names in execution order.
    pub plan: Vec<AppName>,
    /// Per-domain ledgers of every planned app, in plan order. Skipped apps
    /// carry one failed entry per domain.
    pub apps: Vec<AppCaptureReport>,
    pub result: MultiAppResult,
}

impl CaptureRunReport {
    pub fn has_failure(&self) -> bool {
        self.result.has_failure
    }
}

/// Capture `domains` for every app in `scope`, in dependency order.
///
/// An app fails when any of its domains failed; the apps after it are skipped.
/// The report holds one ledger entry per domain per planned app.
pub fn capture<C, S>(
    project: &Project,
    scope: &PlanScope,
    domains: &[Domain],
    capturer: &mut C,
    store: &mut S,
) -> Result<CaptureRunReport, SyncError>
where
    C: DomainCapturer + ?Sized,
    S: DomainStore + ?Sized,
{
    let plan = resolve_plan(&project.config, scope)?;
    tracing::info!(
        "capture plan: {}",
        plan.ordered_apps
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    );

    let mut apps = Vec::with_capacity(plan.len());
    let result = execute_multi_app(&plan, |app| {
        let ledger = capture_app(app, domains, &mut *capturer, &mut *store);
        let outcome = match first_failure(&ledger) {
            None => Ok(()),
            Some((first, count)) => Err(format!(
                "{count} of {} domains failed (first: {}: {})",
                ledger.len(),
                first.domain,
                first.error.as_deref().unwrap_or("unknown error")
            )),
        };
        apps.push(AppCaptureReport {
            app: app.name.clone(),
            domains: ledger,
        });
        outcome
    });

    let failed_app = result
        .results
        .iter()
        .find(|r| r.status == AppStatus::Failed)
        .map(|r| r.name.to_string())
        .unwrap_or_default();
    for skipped in result.results.iter().filter(|r| r.status == AppStatus::Skipped) {
        apps.push(AppCaptureReport {
            app: skipped.name.clone(),
            domains: skipped_app(domains, &failed_app),
        });
    }

    Ok(CaptureRunReport {
        plan: plan.ordered_apps.iter().map(|a| a.name.clone()).collect(),
        apps,
        result,
    })
}

/// Diff of one domain of one app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainDiff {
    pub domain: Domain,
    #[serde(flatten)]
    pub result: DiffResult<DiffLine>,
}

/// Compare the local files of `app` against the remote snapshot at
/// `remote_root`, one [`DomainDiff`] per requested domain.
///
/// A document missing on either side compares as empty.
pub fn diff_app(
    project: &Project,
    app: &AppEntry,
    remote_root: &Path,
    domains: &[Domain],
) -> Result<Vec<DomainDiff>, SyncError> {
    let remote = SnapshotSource::new(remote_root);
    domains
        .iter()
        .map(|&domain| -> Result<DomainDiff, SyncError> {
            tracing::debug!("{}: diffing {domain}", app.name);
            let local = read_or_empty(&project.file_for(app, domain))?;
            let remote_text = remote.read_or_empty(app, domain)?;
            let result = detect_yaml(domain, &local, &remote_text)?;
            Ok(DomainDiff { domain, result })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CaptureError, ErrorKind};
    use tandem_core::ProjectConfig;

    struct Always(Option<ErrorKind>);

    impl DomainCapturer for Always {
        fn capture(&mut self, _: &AppEntry, _: Domain) -> Result<String, CaptureError> {
            match self.0 {
                Some(kind) => Err(CaptureError::new(kind, "scripted")),
                None => Ok(String::new()),
            }
        }
    }

    struct Discard;

    impl DomainStore for Discard {
        fn save(&mut self, _: &AppEntry, _: Domain, _: &str) -> Result<(), CaptureError> {
            Ok(())
        }
    }

    fn project(names: &[(&str, &[&str])]) -> Project {
        let apps = names
            .iter()
            .enumerate()
            .map(|(i, (n, deps))| {
                AppEntry::new(AppName::parse(*n).unwrap(), i.to_string())
                    .with_depends_on(deps.iter().map(|d| AppName::parse(*d).unwrap()))
            })
            .collect();
        Project {
            root: std::env::temp_dir(),
            config: ProjectConfig {
                apps,
                ..ProjectConfig::default()
            },
        }
    }

    #[test]
    fn runs_in_dependency_order() {
        let p = project(&[("orders", &["master"]), ("master", &[])]);
        let report = capture(&p, &PlanScope::All, &Domain::ALL, &mut Always(None), &mut Discard)
            .unwrap();
        let plan: Vec<&str> = report.plan.iter().map(AppName::as_str).collect();
        assert_eq!(plan, vec!["master", "orders"]);
        assert!(!report.has_failure());
        assert_eq!(report.apps.len(), 2);
        assert!(report.apps.iter().all(|a| a.domains.len() == 14));
    }

    #[test]
    fn recoverable_domain_errors_still_fail_the_app() {
        let p = project(&[("a", &[]), ("b", &[])]);
        let report = capture(
            &p,
            &PlanScope::All,
            &Domain::ALL,
            &mut Always(Some(ErrorKind::NotFound)),
            &mut Discard,
        )
        .unwrap();
        assert!(report.has_failure());
        let error = report.result.results[0].error.as_deref().unwrap();
        assert!(error.starts_with("14 of 14 domains failed"), "got: {error}");

        let ledgers: Vec<(&str, usize)> = report
            .apps
            .iter()
            .map(|a| (a.app.as_str(), a.domains.len()))
            .collect();
        assert_eq!(ledgers, vec![("a", 14), ("b", 14)]);
        assert!(report.apps[1].domains.iter().all(|d| !d.success
            && d.error.as_deref() == Some("skipped after failure of a")));
    }

    #[test]
    fn cycle_is_a_plan_error() {
        let p = project(&[("a", &["b"]), ("b", &["a"])]);
        let err = capture(&p, &PlanScope::All, &Domain::ALL, &mut Always(None), &mut Discard)
            .unwrap_err();
        assert!(matches!(err, SyncError::Plan(_)));
    }
}
