//! Aggregation error types

use thiserror::Error;

/// Errors raised by the sales aggregations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// A dataset row carries a borough code outside the catalog.
    /// `row` counts data records from 1, excluding the header.
    #[error("Unknown borough code {code} in data record {row}")]
    UnknownBoroughCode { code: i64, row: usize },

    /// A selection names a borough outside the catalog
    #[error("Unknown borough: {0}")]
    UnknownBorough(String),
}

/// Result type for aggregation operations
pub type AggregateResult<T> = Result<T, AggregateError>;
