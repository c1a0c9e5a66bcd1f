//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::aggregate::{BoroughTotal, MonthlyTotal, NeighborhoodCount, NeighborhoodRanking};
use crate::dataset::{Borough, EnrichedSale};

// ============================================
// BOROUGH DTOs
// ============================================

/// One dropdown option
#[derive(Debug, Serialize)]
pub struct BoroughOption {
    pub code: u8,
    pub name: &'static str,
}

impl From<Borough> for BoroughOption {
    fn from(borough: Borough) -> Self {
        Self {
            code: borough.code(),
            name: borough.name(),
        }
    }
}

/// Borough list response
#[derive(Debug, Serialize)]
pub struct BoroughListResponse {
    pub boroughs: Vec<BoroughOption>,
    pub total: usize,
}

// ============================================
// NEIGHBORHOOD DTOs
// ============================================

/// Top/bottom slice sizes
#[derive(Debug, Default, Deserialize)]
pub struct RankingParams {
    #[serde(default)]
    pub top: Option<usize>,
    #[serde(default)]
    pub bottom: Option<usize>,
}

/// Neighborhood ranking response, one slice per bar chart
#[derive(Debug, Serialize)]
pub struct NeighborhoodResponse {
    pub borough: Borough,
    pub top_title: String,
    pub bottom_title: String,
    pub top: Vec<NeighborhoodCount>,
    pub bottom: Vec<NeighborhoodCount>,
}

impl NeighborhoodResponse {
    pub fn new(ranking: NeighborhoodRanking, top_n: usize, bottom_n: usize) -> Self {
        Self {
            top_title: format!("Top {} Populated Neighborhoods in {}", top_n, ranking.borough),
            bottom_title: format!(
                "Bottom {} Populated Neighborhoods in {}",
                bottom_n, ranking.borough
            ),
            borough: ranking.borough,
            top: ranking.top,
            bottom: ranking.bottom,
        }
    }
}

// ============================================
// TREND DTOs
// ============================================

/// Monthly price trend response
#[derive(Debug, Serialize)]
pub struct TrendResponse {
    pub borough: Borough,
    pub title: String,
    pub months: Vec<MonthlyTotal>,
}

impl TrendResponse {
    pub fn new(borough: Borough, months: Vec<MonthlyTotal>) -> Self {
        Self {
            borough,
            title: format!("Monthly Sales Price Trend in {}", borough),
            months,
        }
    }
}

/// Both borough-scoped views for one selection
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub borough: Borough,
    pub neighborhoods: NeighborhoodResponse,
    pub trend: TrendResponse,
}

// ============================================
// TOTALS DTOs
// ============================================

/// Borough totals response
#[derive(Debug, Serialize)]
pub struct TotalsResponse {
    pub totals: Vec<BoroughTotal>,
    /// Sum over every borough
    pub grand_total: f64,
}

/// Colour scale bounds of the heat map
#[derive(Debug, Serialize, PartialEq)]
pub struct ColorRange {
    pub min: f64,
    pub max: f64,
}

/// Choropleth input: totals plus how to join them to the boundaries
#[derive(Debug, Serialize)]
pub struct ChoroplethResponse {
    pub title: String,
    /// Property path of the borough name in each boundary feature
    pub feature_id_key: String,
    /// Field of each total matched against `feature_id_key`
    pub location_field: String,
    /// Field of each total that drives the colour
    pub value_field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<ColorRange>,
    pub totals: Vec<BoroughTotal>,
}

// ============================================
// SALES TABLE DTOs
// ============================================

/// Data table query parameters
#[derive(Debug, Default, Deserialize)]
pub struct SalesParams {
    /// Restrict to one borough
    #[serde(default)]
    pub borough: Option<String>,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// One page of sale rows
#[derive(Debug, Serialize)]
pub struct SalesPageResponse<'a> {
    /// Rows matching the filter
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub records: Vec<&'a EnrichedSale>,
}

// ============================================
// EXPORT DTOs
// ============================================

/// Export query parameters
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    /// Restrict to one borough
    #[serde(default)]
    pub borough: Option<String>,
    /// Format: csv, json, ndjson
    #[serde(default = "default_export_format")]
    pub format: String,
}

fn default_export_format() -> String {
    "csv".to_string()
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy or degraded
    pub status: String,
    /// Number of sale records loaded
    pub records: usize,
    /// Sales CSV the records were read from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Boroughs with at least one record
    pub boroughs: Vec<Borough>,
    /// Features in the boundary document
    pub boundary_features: usize,
    /// When the dataset was loaded (RFC 3339)
    pub loaded_at: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
