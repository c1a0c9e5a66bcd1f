//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::aggregate::SalesAggregator;
use crate::config::Config;
use crate::dataset::BoroughBoundaries;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Aggregations over the loaded sales dataset
    pub aggregator: Arc<SalesAggregator>,
    /// Boundary document for the choropleth
    pub boundaries: Arc<BoroughBoundaries>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        aggregator: Arc<SalesAggregator>,
        boundaries: Arc<BoroughBoundaries>,
        config: ApiConfig,
    ) -> Self {
        Self {
            aggregator,
            boundaries,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Allowed CORS origins, empty for any
    pub cors_origins: Vec<String>,
    /// Enable data export endpoint
    pub enable_export: bool,
    /// Neighborhoods in the top chart when the request doesn't say
    pub default_top_n: usize,
    /// Neighborhoods in the bottom chart when the request doesn't say
    pub default_bottom_n: usize,
    /// Upper bound on `limit` for the data table
    pub max_page_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ApiConfig {
    fn from(config: &Config) -> Self {
        Self {
            host: config.api.host.clone(),
            port: config.api.port,
            cors_origins: config.api.cors_origins.clone(),
            enable_export: config.api.enable_export,
            default_top_n: config.dashboard.top_n,
            default_bottom_n: config.dashboard.bottom_n,
            max_page_size: config.dashboard.max_page_size,
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
