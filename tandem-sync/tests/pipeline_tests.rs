//! Capture and diff against an on-disk project and remote snapshot.

use std::fs;
use std::path::Path;

use tandem_core::{project, Domain, PlanScope};
use tandem_sync::{pipeline, AppStatus, LocalStore, SnapshotSource, WriteResult};
use tempfile::TempDir;

const PROJECT: &str = r#"
version: 1
remote: remote
apps:
  master:
    app_id: "101"
  orders:
    app_id: "102"
    depends_on: [master]
"#;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn setup() -> TempDir {
    init_logging();
    let root = TempDir::new().expect("root");
    fs::write(root.path().join("tandem.yaml"), PROJECT).expect("project file");
    for id in ["101", "102"] {
        let dir = root.path().join("remote").join(id);
        fs::create_dir_all(&dir).expect("remote dir");
        for domain in Domain::ALL {
            fs::write(dir.join(domain.file_name()), "").expect("remote doc");
        }
    }
    fs::write(
        root.path().join("remote/102/view.yaml"),
        "views:\n  All: { type: LIST, index: 0 }\n",
    )
    .expect("view");
    root
}

fn write_remote(root: &Path, app_id: &str, domain: Domain, text: &str) {
    fs::write(root.join("remote").join(app_id).join(domain.file_name()), text).expect("write");
}

#[test]
fn capture_writes_local_files_then_is_idempotent() {
    let root = setup();
    let project = project::load_at(root.path()).expect("load");
    let remote = project.remote_root(None).expect("remote configured");

    let mut source = SnapshotSource::new(&remote);
    let mut store = LocalStore::new(&project, false);
    let report =
        pipeline::capture(&project, &PlanScope::All, &Domain::ALL, &mut source, &mut store)
            .expect("capture");
    let writes = store.finish().expect("finish");

    assert!(!report.has_failure());
    let order: Vec<&str> = report.plan.iter().map(|n| n.as_str()).collect();
    assert_eq!(order, vec!["master", "orders"]);
    assert_eq!(writes.len(), 28);
    assert!(writes.iter().all(|w| matches!(w, WriteResult::Written { .. })));

    let view = fs::read_to_string(root.path().join("apps/orders/view.yaml")).expect("view");
    assert!(view.contains("All:"));
    assert!(root.path().join(".tandem/hashes/orders.json").exists());

    let mut store = LocalStore::new(&project, false);
    pipeline::capture(&project, &PlanScope::All, &Domain::ALL, &mut source, &mut store)
        .expect("second capture");
    let writes = store.finish().expect("finish");
    assert!(writes.iter().all(|w| matches!(w, WriteResult::Unchanged { .. })));
}

#[test]
fn dry_run_writes_nothing() {
    let root = setup();
    let project = project::load_at(root.path()).expect("load");
    let mut source = SnapshotSource::new(root.path().join("remote"));
    let mut store = LocalStore::new(&project, true);
    let report = pipeline::capture(
        &project,
        &PlanScope::App("orders".into()),
        &Domain::ALL,
        &mut source,
        &mut store,
    )
    .expect("capture");
    let writes = store.finish().expect("finish");

    assert_eq!(report.plan.len(), 1, "single-app scope does not expand deps");
    assert!(writes
        .iter()
        .any(|w| matches!(w, WriteResult::WouldWrite { diff, .. } if diff.contains("+views:"))));
    assert!(!root.path().join("apps").exists());
    assert!(!root.path().join(".tandem").exists());
}

#[test]
fn unreachable_remote_fails_first_app_and_skips_the_rest() {
    let root = setup();
    let project = project::load_at(root.path()).expect("load");
    let mut source = SnapshotSource::new(root.path().join("offline"));
    let mut store = LocalStore::new(&project, false);
    let report =
        pipeline::capture(&project, &PlanScope::All, &Domain::ALL, &mut source, &mut store)
            .expect("capture");

    let statuses: Vec<AppStatus> = report.result.results.iter().map(|r| r.status).collect();
    assert_eq!(statuses, vec![AppStatus::Failed, AppStatus::Skipped]);
    assert_eq!(report.apps.len(), 2, "skipped apps keep a ledger too");
    assert!(report
        .apps
        .iter()
        .all(|a| a.domains.len() == 14 && a.domains.iter().all(|d| !d.success)));
    assert_eq!(
        report.apps[1].domains[0].error.as_deref(),
        Some("skipped after failure of master")
    );
    assert!(store.writes().is_empty());
}

#[test]
fn invalid_remote_document_is_recoverable() {
    let root = setup();
    write_remote(root.path(), "101", Domain::Schema, "fields: [not, a, map");
    let project = project::load_at(root.path()).expect("load");
    let mut source = SnapshotSource::new(root.path().join("remote"));
    let mut store = LocalStore::new(&project, false);
    let report = pipeline::capture(
        &project,
        &PlanScope::App("master".into()),
        &Domain::ALL,
        &mut source,
        &mut store,
    )
    .expect("capture");

    let master = &report.apps[0];
    let failed: Vec<Domain> = master
        .domains
        .iter()
        .filter(|d| !d.success)
        .map(|d| d.domain)
        .collect();
    assert_eq!(failed, vec![Domain::Schema]);
    assert!(report.has_failure());
}

#[test]
fn diff_app_compares_local_against_remote() {
    let root = setup();
    let project = project::load_at(root.path()).expect("load");
    let orders = project.config.app("orders").expect("orders").clone();
    let remote = root.path().join("remote");

    let diffs = pipeline::diff_app(&project, &orders, &remote, &[Domain::View]).expect("diff");
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].result.summary.deleted, 1, "view only exists remotely");

    let local_view = project.file_for(&orders, Domain::View);
    fs::create_dir_all(local_view.parent().expect("parent")).expect("mkdir");
    fs::write(&local_view, "views:\n  All: { type: LIST, index: 0 }\n  Mine: { type: LIST, index: 1 }\n")
        .expect("write");

    let diffs = pipeline::diff_app(&project, &orders, &remote, &Domain::ALL).expect("diff");
    assert_eq!(diffs.len(), 14);
    let view = diffs.iter().find(|d| d.domain == Domain::View).expect("view");
    assert_eq!(view.result.summary.added, 1);
    assert_eq!(view.result.entries[0].key, "Mine");
    assert!(diffs
        .iter()
        .filter(|d| d.domain != Domain::View)
        .all(|d| d.result.is_empty));
}

#[test]
fn diff_app_without_remote_is_an_error() {
    let root = setup();
    let project = project::load_at(root.path()).expect("load");
    let orders = project.config.app("orders").expect("orders").clone();
    let result = pipeline::diff_app(&project, &orders, &root.path().join("missing"), &Domain::ALL);
    assert!(result.is_err());
}
