//! # Borough Sales
//!
//! Backend of a New York City property sales dashboard. The rolling sales
//! dataset and the borough boundaries are loaded once at startup; every
//! chart of the dashboard is then a pure aggregation over that immutable
//! dataset, served as JSON.
//!
//! ## Modules
//!
//! - [`dataset`]: borough catalog, CSV and GeoJSON loading
//! - [`aggregate`]: neighborhood ranking, monthly trend, borough totals
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//! - [`telemetry`]: tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use borough_sales::aggregate::{enrich_borough_names, SalesAggregator};
//! use borough_sales::dataset::{SalesDataset, SalesLoader};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let path = Path::new("data/nyc-rolling-sales_cleaned.csv");
//!     let records = enrich_borough_names(SalesLoader::new().load(path)?)?;
//!     let aggregator = SalesAggregator::new(Arc::new(SalesDataset::new(records)));
//!
//!     let ranking = aggregator.rank_neighborhoods("Brooklyn", 5, 5)?;
//!     for entry in &ranking.top {
//!         println!("{}: {}", entry.neighborhood, entry.count);
//!     }
//!
//!     for total in aggregator.borough_totals() {
//!         println!("{}: ${:.0}", total.borough_name, total.sale_price);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod api;
pub mod config;
pub mod dataset;
pub mod telemetry;

// Re-export top-level types for convenience
pub use dataset::{
    Borough, BoroughBoundaries, DatasetError, DatasetResult, EnrichedSale, SaleRecord,
    SalesDataset, SalesLoader, YearMonth,
};

pub use aggregate::{
    borough_totals, enrich_borough_names, monthly_trend, rank_neighborhoods, AggregateError,
    AggregateResult, BoroughDashboard, BoroughTotal, MonthlyTotal, NeighborhoodCount,
    NeighborhoodRanking, SalesAggregator,
};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError, DashboardConfig, DataConfig, LoggingConfig};

pub use telemetry::{init_logging, TelemetryError};

use std::path::Path;
use std::sync::Arc;

/// Load the sales CSV with `loader` and attach borough names.
///
/// Any load failure or unknown borough code is returned; callers abort
/// startup on error.
pub fn load_sales(path: &Path, loader: &SalesLoader) -> Result<Arc<SalesDataset>, StartupError> {
    let raw = loader.load(path)?;
    let records = enrich_borough_names(raw)?;
    Ok(Arc::new(SalesDataset::new(records).source(path)))
}

/// Why the startup inputs could not be prepared
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}
