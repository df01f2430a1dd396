//! Errors raised at the boundaries of the view.
//!
//! - [`DraftError`] when a user form cannot become a record payload.
//! - [`RecordError`] when a server item violates the record invariants.
//! - [`ExportError`] when a CSV export cannot be produced.
use thiserror::Error;

/// Client-side validation failures of a record or period form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("missing record kind")]
    MissingKind,
    #[error("unknown record kind: {0}")]
    UnknownKind(String),
    #[error("missing amount")]
    MissingAmount,
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("missing date")]
    MissingDate,
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("start of the period is after its end")]
    InvalidRange,
}

/// A server item that cannot enter the working set.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("item {id}: amount {amount} is not a positive number")]
    InvalidAmount { id: i64, amount: f64 },
    #[error("item {id}: id already used by another item of the batch")]
    DuplicateId { id: i64 },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
