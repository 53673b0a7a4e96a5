//! Error types shared by the model, store and file layers.

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::Interval;

/// Boundary validation failures: malformed dates, inverted ranges, unknown tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDateFormat(String),
    #[error("invalid range: end {end} is before start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("unknown zoom level '{0}': expected hour, day, week or month")]
    InvalidZoomLevel(String),
    #[error("unknown work order status '{0}'")]
    InvalidStatus(String),
}

/// A rejected write: the candidate interval overlaps committed orders on its row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub work_center_id: String,
    pub candidate: Interval,
    /// Ids of the committed orders the candidate collides with.
    pub conflicting_ids: Vec<String>,
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} overlaps {} existing order(s) on work center {}",
            self.candidate,
            self.conflicting_ids.len(),
            self.work_center_id
        )
    }
}

/// Outcome of a failed store mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("conflict: {0}")]
    Conflict(Conflict),
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("work order name must not be empty")]
    EmptyName,
    #[error(transparent)]
    Invalid(#[from] TimelineError),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}

/// Failures reading or writing schedule documents and CSV files.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("file access failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid schedule document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate {kind} id '{id}' in schedule document")]
    DuplicateId { kind: &'static str, id: String },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV is missing required columns (found {found:?}); need work center, name, start date, end date")]
    MissingColumns { found: Vec<String> },
    #[error("no valid work orders found ({skipped} rows skipped)")]
    NoRows { skipped: usize },
}
