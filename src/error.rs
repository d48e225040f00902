//! Error handling for catalogue parsing, profile conversion and export.
//!
//! Only failures that abort a whole operation live in [`CatalogError`].
//! Problems confined to one catalogue line or block are [`RecordError`]s:
//! the parser counts them and moves on.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::CatalogField;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalogue source unavailable: {path} - {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Invalid profile format in file: {path} (line {line}) - {reason}")]
    ProfileFormat {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Profile file contains no amplitude samples: {path}")]
    EmptyProfile { path: PathBuf },

    #[error("Export failed for file: {path} - {reason}")]
    Export { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl CatalogError {
    pub fn source_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Reason a single line or block was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("required field {field} is missing")]
    MissingRequired { field: CatalogField },

    #[error("field {field} has non-numeric value '{value}'")]
    InvalidNumber { field: CatalogField, value: String },

    #[error("malformed input: {reason}")]
    Malformed { reason: String },
}
