//! Totals Routes
//!
//! Selection-independent data behind the heat map.
//!
//! - GET /api/v1/totals - Sale price totals per borough
//! - GET /api/v1/choropleth - Totals with join key and colour range
//! - GET /api/v1/boundaries - Borough boundary GeoJSON

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::aggregate::price_range;
use crate::api::dto::{ChoroplethResponse, ColorRange, TotalsResponse};
use crate::api::state::AppState;

/// GET /api/v1/totals
pub async fn get_totals(State(state): State<Arc<AppState>>) -> Json<TotalsResponse> {
    let totals = state.aggregator.borough_totals().to_vec();
    let grand_total = totals.iter().map(|t| t.sale_price).sum();

    Json(TotalsResponse {
        totals,
        grand_total,
    })
}

/// GET /api/v1/choropleth
///
/// Totals keyed by borough name, to be joined against the boundary
/// features at `feature_id_key`. The colour range spans the smallest to
/// the largest total and is omitted when there is no data.
pub async fn get_choropleth(State(state): State<Arc<AppState>>) -> Json<ChoroplethResponse> {
    let totals = state.aggregator.borough_totals();

    Json(ChoroplethResponse {
        title: "Heat Map of Total Sale Price by Borough in New York City".to_string(),
        feature_id_key: state.boundaries.feature_id_key().to_string(),
        location_field: "borough_name".to_string(),
        value_field: "sale_price".to_string(),
        range: price_range(totals).map(|(min, max)| ColorRange { min, max }),
        totals: totals.to_vec(),
    })
}

/// GET /api/v1/boundaries
///
/// The boundary document exactly as loaded at startup.
pub async fn get_boundaries(State(state): State<Arc<AppState>>) -> Response {
    Json(state.boundaries.document()).into_response()
}
