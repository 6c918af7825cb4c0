// src/error.rs

use std::{io, path::PathBuf};

use arrow::error::ArrowError;
use thiserror::Error;

use crate::schema::MismatchReport;

/// Everything that can stop a merge run.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("i/o error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} has no header row", path.display())]
    EmptyFile { path: PathBuf },

    #[error("{} declares column `{column}` more than once", path.display())]
    DuplicateColumn { path: PathBuf, column: String },

    #[error(
        "{} line {line}: expected {expected} fields, found {found}",
        path.display()
    )]
    RaggedRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("month `{month}` row {row}: expected {expected} fields, found {found}")]
    RaggedRecord {
        month: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("month folder {} contains no data file", folder.display())]
    EmptyMonthFolder { folder: PathBuf },

    #[error(
        "month folder {} contains {} data files, expected exactly one: {files:?}",
        folder.display(),
        files.len()
    )]
    AmbiguousMonthFolder { folder: PathBuf, files: Vec<String> },

    #[error("month `{month}` is provided by both {} and {}", first.display(), second.display())]
    DuplicateMonth {
        month: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("reference month `{month}` not found among {available:?}")]
    MissingReferenceMonth {
        month: String,
        available: Vec<String>,
    },

    #[error("no month datasets to join")]
    NoMonths,

    #[error("columns differ from reference month `{reference}`: {report}")]
    SchemaMismatch {
        reference: String,
        report: MismatchReport,
    },

    #[error(transparent)]
    Arrow(#[from] ArrowError),
}

pub type Result<T, E = MergeError> = std::result::Result<T, E>;

/// Attach the offending path to an [`io::Error`].
pub(crate) fn io_at(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> MergeError {
    let path = path.into();
    move |source| MergeError::Io { path, source }
}
