//! Export Routes
//!
//! Download of the enriched sale rows.
//!
//! - GET /api/v1/export - Export rows as a file attachment

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::ExportParams;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dataset::EnrichedSale;

/// Supported export encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Ndjson,
}

impl ExportFormat {
    pub fn parse(s: &str) -> ApiResult<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "ndjson" => Ok(ExportFormat::Ndjson),
            other => Err(ApiError::Validation(format!(
                "Unsupported export format: {}",
                other
            ))),
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
            ExportFormat::Ndjson => "application/x-ndjson",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Ndjson => "ndjson",
        }
    }
}

/// GET /api/v1/export
///
/// Export the sale rows, optionally for one borough.
pub async fn export_sales(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportParams>,
) -> ApiResult<Response> {
    if !state.config.enable_export {
        return Err(ApiError::Validation(
            "Export feature is disabled".to_string(),
        ));
    }

    let format = ExportFormat::parse(&params.format)?;
    let rows = state.aggregator.filtered(params.borough.as_deref())?;

    let body = match format {
        ExportFormat::Csv => format_csv(&rows)?,
        ExportFormat::Json => format_json(&rows)?,
        ExportFormat::Ndjson => format_ndjson(&rows)?,
    };

    tracing::info!(rows = rows.len(), format = ?format, "Exported sales");

    let filename = format!(
        "borough_sales_{}.{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        format.extension()
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        Body::from(body),
    )
        .into_response())
}

/// Format as CSV
pub fn format_csv(rows: &[&EnrichedSale]) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| ApiError::Internal(format!("CSV encoding failed: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::Internal(format!("CSV encoding failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| ApiError::Internal(e.to_string()))
}

/// Format as JSON array
pub fn format_json(rows: &[&EnrichedSale]) -> ApiResult<String> {
    serde_json::to_string_pretty(rows).map_err(|e| ApiError::Internal(e.to_string()))
}

/// Format as newline-delimited JSON
pub fn format_ndjson(rows: &[&EnrichedSale]) -> ApiResult<String> {
    let mut ndjson = String::new();

    for row in rows {
        let line = serde_json::to_string(row).map_err(|e| ApiError::Internal(e.to_string()))?;
        ndjson.push_str(&line);
        ndjson.push('\n');
    }

    Ok(ndjson)
}
