//! Error types shared by loading, validation, configuration and export.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, MapError>;

/// Errors that abort a load, a customization or an export.
///
/// Per-row data problems (unknown codes, duplicates, bad values) are never
/// reported here; they end up in [`crate::models::ValidationReport`].
#[derive(Debug, Error)]
pub enum MapError {
    // === Input ===
    /// The source cannot be used at all (missing file, empty table, unknown column...).
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The CSV reader failed on the file.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The spreadsheet reader failed on the workbook.
    #[error("failed to read workbook {path}: {reason}")]
    Workbook { path: PathBuf, reason: String },

    /// Column auto-detection found zero or several candidates for a role.
    #[error("cannot detect the {role} column (candidates: {}); pass it explicitly", fmt_candidates(.candidates))]
    AmbiguousColumns {
        role: ColumnRole,
        candidates: Vec<String>,
    },

    // === Configuration ===
    /// A configuration key holds a value outside its allowed set.
    #[error("invalid configuration for `{key}`: {reason}")]
    InvalidConfig { key: String, reason: String },

    // === Output ===
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl MapError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        MapError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(key: &str, reason: impl Into<String>) -> Self {
        MapError::InvalidConfig {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failures of a single export call. A failed export leaves existing files untouched.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No backend is able to produce the requested static format.
    #[error("cannot export .{format}: {hint}")]
    BackendUnavailable { format: String, hint: String },

    /// Writing or renaming the output file failed.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The drawing backend reported an error.
    #[error("failed to render {path}: {message}")]
    Render { path: PathBuf, message: String },
}

/// Which column auto-detection was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    State,
    Value,
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnRole::State => write!(f, "state code"),
            ColumnRole::Value => write!(f, "value"),
        }
    }
}

fn fmt_candidates(candidates: &[String]) -> String {
    if candidates.is_empty() {
        "none".to_string()
    } else {
        candidates.join(", ")
    }
}
