//! Errors raised while loading a leaderboard source.
//!
//! Loading is the only fallible stage. Once a batch of entries has been built,
//! filtering, sorting and rendering cannot fail.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("leaderboard file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read leaderboard file: {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported leaderboard file type '{extension}': {}", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("failed to parse CSV: {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to parse workbook: {}: {source}", .path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("workbook has no worksheets: {}", .path.display())]
    EmptyWorkbook { path: PathBuf },

    #[error("missing required column(s) {}: {}", .columns.join(", "), .path.display())]
    FieldMissing {
        path: PathBuf,
        columns: Vec<&'static str>,
    },

    #[error("row {row}: invalid {column} value '{value}', expected {expected}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error(
        "'Most Recent' mixes durations (row {duration_row}) and plain day counts (row {number_row})"
    )]
    MixedRecency {
        duration_row: usize,
        number_row: usize,
    },
}

impl LoadError {
    /// True when the source lacks one of the required columns.
    pub fn is_field_missing(&self) -> bool {
        matches!(self, LoadError::FieldMissing { .. })
    }
}
