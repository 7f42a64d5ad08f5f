//! Project file error-message, layout and init integration tests.

use std::fs;
use std::path::PathBuf;

use assert_fs::prelude::*;
use predicates::prelude::predicate;
use tandem_core::{project, Domain, ProjectError};

// ---------------------------------------------------------------------------
// 1. Load error messages
// ---------------------------------------------------------------------------

#[test]
fn load_missing_project_returns_not_found() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    let err = project::load_at(root.path()).unwrap_err();
    assert!(matches!(err, ProjectError::ProjectNotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("project file not found"));
    assert!(err.to_string().contains("tandem.yaml"));
}

#[test]
fn load_corrupt_yaml_returns_parse_error_with_path() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("tandem.yaml")
        .write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");

    let err = project::load_at(root.path()).unwrap_err();
    assert!(matches!(err, ProjectError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("tandem.yaml"), "must contain file path");
}

#[test]
fn duplicate_app_names_are_rejected() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("tandem.yaml")
        .write_str("version: 1\napps:\n  a:\n    app_id: '1'\n  a:\n    app_id: '2'\n")
        .expect("write");

    let err = project::load_at(root.path()).unwrap_err();
    assert!(matches!(err, ProjectError::Parse { .. }), "got: {err}");
}

#[test]
fn unknown_app_keys_are_rejected() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("tandem.yaml")
        .write_str("version: 1\napps:\n  a:\n    app_id: '1'\n    dependson: [b]\n")
        .expect("write");

    let err = project::load_at(root.path()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("dependson"), "got: {msg}");
}

#[test]
fn unsupported_version_is_rejected() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("tandem.yaml")
        .write_str("version: 7\napps: {}\n")
        .expect("write");

    let err = project::load_at(root.path()).unwrap_err();
    assert!(matches!(err, ProjectError::UnsupportedVersion { version: 7, .. }));
}

// ---------------------------------------------------------------------------
// 2. Layout
// ---------------------------------------------------------------------------

#[test]
fn file_locations_resolve_against_root() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("tandem.yaml")
        .write_str(
            "version: 1\n\
             apps:\n  \
               Orders:\n    \
                 app_id: '12'\n    \
                 files:\n      \
                   view: views/orders.yaml\n  \
               billing:\n    \
                 app_id: '13'\n    \
                 dir: custom/billing\n",
        )
        .expect("write");

    let loaded = project::load_at(root.path()).expect("load");
    let orders = loaded.config.app("Orders").expect("orders");
    let billing = loaded.config.app("billing").expect("billing");

    assert_eq!(
        loaded.file_for(orders, Domain::View),
        root.path().join("apps/orders/views/orders.yaml")
    );
    assert_eq!(
        loaded.file_for(orders, Domain::RecordAcl),
        root.path().join("apps/orders/record-acl.yaml")
    );
    assert_eq!(
        loaded.file_for(billing, Domain::Schema),
        root.path().join("custom/billing/schema.yaml")
    );
}

// ---------------------------------------------------------------------------
// 3. Init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_project_file() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    let created = project::init_at(root.path(), Some(PathBuf::from("remote"))).expect("init");

    root.child("tandem.yaml").assert(predicate::path::exists());
    let contents = fs::read_to_string(root.path().join("tandem.yaml")).expect("read");
    assert!(contents.contains("version: 1"));
    assert!(contents.contains("remote: remote"));
    assert!(created.config.apps.is_empty());
}

#[test]
fn init_does_not_overwrite_existing_apps() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("tandem.yaml")
        .write_str("version: 1\napps:\n  keep:\n    app_id: '9'\n")
        .expect("write");

    let loaded = project::init_at(root.path(), None).expect("init");
    assert_eq!(loaded.config.app_names(), vec!["keep"]);
}
