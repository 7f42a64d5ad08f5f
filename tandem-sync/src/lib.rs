//! # tandem-sync
//!
//! Capture orchestration: fail-fast multi-app execution, per-app domain
//! capture with fatal/recoverable classification, the remote snapshot reader
//! and the hash-gated local store.
//!
//! Call [`pipeline::capture`] to capture a plan, or [`pipeline::diff_app`] to
//! compare one app against a remote snapshot.

pub mod capture;
pub mod error;
pub mod executor;
pub mod hash_store;
pub mod pipeline;
pub mod snapshot;
pub mod storage;

pub use capture::{capture_app, CaptureResult, DomainCapturer, DomainStore};
pub use error::{classify, CaptureError, ErrorKind, Severity, SyncError};
pub use executor::{execute_multi_app, AppExecutionResult, AppStatus, MultiAppResult};
pub use pipeline::{AppCaptureReport, CaptureRunReport, DomainDiff};
pub use snapshot::SnapshotSource;
pub use storage::{LocalStore, WriteResult};
