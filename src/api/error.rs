//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::aggregate::AggregateError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Aggregation rejected the selection or hit bad data
    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    /// HTTP status and machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Aggregate(AggregateError::UnknownBorough(_)) => {
                (StatusCode::NOT_FOUND, "UNKNOWN_BOROUGH")
            }
            ApiError::Aggregate(AggregateError::UnknownBoroughCode { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "DATA_QUALITY_ERROR")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "API error occurred"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err: ApiError = AggregateError::UnknownBorough("Hoboken".to_string()).into();
        assert_eq!(
            err.status_and_code(),
            (StatusCode::NOT_FOUND, "UNKNOWN_BOROUGH")
        );
        assert_eq!(err.to_string(), "Unknown borough: Hoboken");

        let err: ApiError = AggregateError::UnknownBoroughCode { code: 9, row: 1 }.into();
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::Validation("top must be at most 100".to_string());
        assert_eq!(err.status_and_code().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_into_response_status() {
        let response: Response =
            ApiError::from(AggregateError::UnknownBorough("Hoboken".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::Validation("bad limit".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
