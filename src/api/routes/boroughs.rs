//! Borough Routes
//!
//! The dropdown options and the views that follow a borough selection.
//!
//! - GET /api/v1/boroughs - List the five boroughs
//! - GET /api/v1/boroughs/:name/neighborhoods - Top/bottom neighborhoods
//! - GET /api/v1/boroughs/:name/trend - Monthly sale price totals
//! - GET /api/v1/boroughs/:name/dashboard - Both of the above

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::aggregate::resolve_borough;
use crate::api::dto::{
    BoroughListResponse, BoroughOption, DashboardResponse, NeighborhoodResponse, RankingParams,
    TrendResponse,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dataset::Borough;

/// Largest top/bottom slice a request may ask for
pub const MAX_SLICE: usize = 100;

/// GET /api/v1/boroughs
pub async fn list_boroughs() -> Json<BoroughListResponse> {
    let boroughs: Vec<BoroughOption> = Borough::ALL
        .into_iter()
        .map(BoroughOption::from)
        .collect();

    Json(BoroughListResponse {
        total: boroughs.len(),
        boroughs,
    })
}

/// GET /api/v1/boroughs/:name/neighborhoods
///
/// Neighborhoods ranked by number of sales. `top` and `bottom` default to
/// the configured slice sizes.
pub async fn get_neighborhoods(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<RankingParams>,
) -> ApiResult<Json<NeighborhoodResponse>> {
    let (top_n, bottom_n) = slice_sizes(&state, &params)?;

    let ranking = state.aggregator.rank_neighborhoods(&name, top_n, bottom_n)?;

    Ok(Json(NeighborhoodResponse::new(ranking, top_n, bottom_n)))
}

/// GET /api/v1/boroughs/:name/trend
pub async fn get_trend(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<TrendResponse>> {
    let borough = resolve_borough(&name)?;
    let months = state.aggregator.monthly_trend(borough.name())?;

    Ok(Json(TrendResponse::new(borough, months)))
}

/// GET /api/v1/boroughs/:name/dashboard
///
/// Everything that re-renders on a selection change, in one round trip.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<RankingParams>,
) -> ApiResult<Json<DashboardResponse>> {
    let (top_n, bottom_n) = slice_sizes(&state, &params)?;

    let view = state.aggregator.dashboard(&name, top_n, bottom_n)?;

    tracing::debug!(borough = %view.borough, top_n, bottom_n, "Served dashboard");

    Ok(Json(DashboardResponse {
        borough: view.borough,
        neighborhoods: NeighborhoodResponse::new(view.neighborhoods, top_n, bottom_n),
        trend: TrendResponse::new(view.borough, view.trend),
    }))
}

/// Resolve and validate the requested slice sizes
fn slice_sizes(state: &AppState, params: &RankingParams) -> ApiResult<(usize, usize)> {
    let top_n = params.top.unwrap_or(state.config.default_top_n);
    let bottom_n = params.bottom.unwrap_or(state.config.default_bottom_n);

    if top_n > MAX_SLICE || bottom_n > MAX_SLICE {
        return Err(ApiError::Validation(format!(
            "top and bottom must be at most {}",
            MAX_SLICE
        )));
    }

    Ok((top_n, bottom_n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_boroughs() {
        let Json(response) = list_boroughs().await;

        assert_eq!(response.total, 5);
        assert_eq!(response.boroughs[0].code, 1);
        assert_eq!(response.boroughs[4].name, "Staten Island");
    }
}
