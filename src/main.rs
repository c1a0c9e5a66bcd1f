//! Borough Sales API Server
//!
//! Run with: cargo run --bin borough-sales
//!
//! # Configuration
//!
//! `BOROUGH_SALES_CONFIG` names a TOML config file; otherwise the default
//! locations are searched. Environment variables override the file:
//! - `BOROUGH_SALES_CSV`: Sales CSV path
//! - `BOROUGH_SALES_GEOJSON`: Borough boundary GeoJSON path
//! - `BOROUGH_SALES_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `BOROUGH_SALES_API_PORT`: Port to listen on (default: 8086)
//! - `BOROUGH_SALES_LOG_LEVEL`: Log level (default: info)
//! - `BOROUGH_SALES_LOG_FORMAT`: pretty or json
//! - `RUST_LOG`: Full filter directive, wins over the log level

use anyhow::Context;
use borough_sales::api::{serve, ApiConfig, AppState};
use borough_sales::config::Config;
use borough_sales::dataset::{BoroughBoundaries, SalesLoader};
use borough_sales::{load_sales, telemetry, SalesAggregator};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;

    telemetry::init_logging(&config.logging).context("Failed to initialize logging")?;

    tracing::info!("Starting Borough Sales server v{}", env!("CARGO_PKG_VERSION"));

    // Both inputs are loaded once; any failure aborts startup
    tracing::info!("Loading sales from {:?}", config.data.sales_csv);
    let loader = SalesLoader::from_config(&config.data)?;
    let dataset = load_sales(&config.data.sales_csv, &loader)
        .with_context(|| format!("Failed to load sales from {:?}", config.data.sales_csv))?;

    tracing::info!(
        records = dataset.len(),
        boroughs = ?dataset.boroughs_present(),
        "Sales dataset loaded"
    );
    if dataset.is_empty() {
        tracing::warn!("Sales dataset is empty, every chart will be blank");
    }

    tracing::info!("Loading boundaries from {:?}", config.data.boundaries_geojson);
    let boundaries =
        BoroughBoundaries::load(&config.data.boundaries_geojson, &config.data.feature_id_key)
            .with_context(|| {
                format!(
                    "Failed to load boundaries from {:?}",
                    config.data.boundaries_geojson
                )
            })?;
    tracing::info!(
        features = boundaries.feature_names().len(),
        "Boundaries loaded"
    );

    let aggregator = Arc::new(SalesAggregator::new(dataset));
    let api_config = ApiConfig::from(&config);

    let state = AppState::new(aggregator, Arc::new(boundaries), api_config.clone());

    tracing::info!("Starting server on {}", api_config.addr());
    serve(state, &api_config).await?;

    tracing::info!("Borough Sales server stopped");
    Ok(())
}

/// Explicit config file if `BOROUGH_SALES_CONFIG` is set, else the default search
fn load_config() -> anyhow::Result<Config> {
    match std::env::var_os("BOROUGH_SALES_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            Config::load_with_env(&path)
                .with_context(|| format!("Failed to load config {:?}", path))
        }
        None => Ok(Config::load_default()),
    }
}
