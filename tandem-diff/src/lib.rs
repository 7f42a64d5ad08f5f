pub mod compare;
pub mod domains;
pub mod error;
pub mod result;
pub mod strategy;

pub use compare::{deep_equal, describe_changes};
pub use domains::{detect_yaml, normalize_yaml, Entity, Query};
pub use error::DiffError;
pub use result::{DiffEntry, DiffLine, DiffResult, DiffSummary, DiffType};
