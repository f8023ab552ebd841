//! Errors produced while compacting a glyph table.

use std::path::PathBuf;

use crate::table::ParseError;

/// Errors that can occur while reading, compacting or writing a table.
///
/// Every variant except [`CompactError::BackupFailure`] is fatal for the run.
/// A backup failure is fatal only when the backup is required (the default).
#[derive(Debug, thiserror::Error)]
pub enum CompactError {
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Malformed table: no glyph entries found in the body of {table}[]")]
    MalformedTable { table: String },

    #[error("Failed to back up input to {path}: {source} (use --force to continue without a backup)")]
    BackupFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output {path}: {source}")]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },
}
