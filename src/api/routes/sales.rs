//! Sales Routes
//!
//! - GET /api/v1/sales - Page through the raw sale rows (data table)

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{SalesPageResponse, SalesParams};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

pub const DEFAULT_PAGE_SIZE: usize = 100;

/// GET /api/v1/sales
///
/// `borough` filters to one borough; `offset`/`limit` page the result.
pub async fn list_sales(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SalesParams>,
) -> ApiResult<Response> {
    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE);

    if limit > state.config.max_page_size {
        return Err(ApiError::Validation(format!(
            "limit must be at most {}",
            state.config.max_page_size
        )));
    }

    let page = state
        .aggregator
        .records(params.borough.as_deref(), offset, limit)?;

    Ok(Json(SalesPageResponse {
        total: page.total,
        offset: page.offset,
        limit,
        records: page.records,
    })
    .into_response())
}
