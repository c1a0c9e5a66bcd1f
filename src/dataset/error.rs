//! Dataset error types
//!
//! Errors raised while loading the startup inputs. All of them are fatal:
//! a dashboard that cannot read its data has nothing correct to show.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the sales CSV or the boundary document
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Input file could not be opened or read
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV framing error (bad quoting, invalid UTF-8, ...)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A data row could not be parsed
    #[error("Line {line}: {message}")]
    InvalidRow { line: usize, message: String },

    /// The configured CSV delimiter is not a single ASCII character
    #[error("Invalid CSV delimiter {0:?}: must be ASCII")]
    InvalidDelimiter(char),

    /// The boundary GeoJSON is malformed
    #[error("Invalid boundary document: {0}")]
    Boundaries(String),
}

impl From<serde_json::Error> for DatasetError {
    fn from(err: serde_json::Error) -> Self {
        DatasetError::Boundaries(err.to_string())
    }
}

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;
