//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::aggregate::{DEFAULT_BOTTOM_N, DEFAULT_TOP_N};
use crate::dataset::{DEFAULT_DATE_FORMAT, DEFAULT_DELIMITER, DEFAULT_FEATURE_ID_KEY};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Input file locations
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_sales_csv")]
    pub sales_csv: PathBuf,

    #[serde(default = "default_boundaries_geojson")]
    pub boundaries_geojson: PathBuf,

    /// Dotted path of the borough name inside each boundary feature
    #[serde(default = "default_feature_id_key")]
    pub feature_id_key: String,

    /// Sale date format tried before the built-in ones (strftime)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Field separator of the sales CSV
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_sales_csv() -> PathBuf {
    PathBuf::from("data/nyc-rolling-sales_cleaned.csv")
}

fn default_boundaries_geojson() -> PathBuf {
    PathBuf::from("data/Borough Boundaries.geojson")
}

fn default_feature_id_key() -> String {
    DEFAULT_FEATURE_ID_KEY.to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            sales_csv: default_sales_csv(),
            boundaries_geojson: default_boundaries_geojson(),
            feature_id_key: default_feature_id_key(),
            date_format: default_date_format(),
            delimiter: default_delimiter(),
        }
    }
}

/// Dashboard view defaults
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    #[serde(default = "default_bottom_n")]
    pub bottom_n: usize,

    /// Largest page the data table endpoint will return
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_bottom_n() -> usize {
    DEFAULT_BOTTOM_N
}

fn default_max_page_size() -> usize {
    1000
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            bottom_n: default_bottom_n(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_enable_export")]
    pub enable_export: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8086
}

fn default_enable_export() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            enable_export: default_enable_export(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("borough-sales").join("config.toml")),
            Some(PathBuf::from("/etc/borough-sales/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Data overrides
        if let Some(path) = var("BOROUGH_SALES_CSV") {
            self.data.sales_csv = PathBuf::from(path);
        }
        if let Some(path) = var("BOROUGH_SALES_GEOJSON") {
            self.data.boundaries_geojson = PathBuf::from(path);
        }

        // API overrides
        if let Some(host) = var("BOROUGH_SALES_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("BOROUGH_SALES_API_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid BOROUGH_SALES_API_PORT"),
            }
        }

        // Logging overrides
        if let Some(level) = var("BOROUGH_SALES_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("BOROUGH_SALES_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Borough Sales Configuration
#
# Environment variables override these settings:
# - BOROUGH_SALES_CSV
# - BOROUGH_SALES_GEOJSON
# - BOROUGH_SALES_API_HOST
# - BOROUGH_SALES_API_PORT
# - BOROUGH_SALES_LOG_LEVEL
# - BOROUGH_SALES_LOG_FORMAT

[data]
# Rolling sales CSV (needs BOROUGH, NEIGHBORHOOD, SALE PRICE, SALE DATE)
sales_csv = "data/nyc-rolling-sales_cleaned.csv"

# Borough boundary GeoJSON for the heat map
boundaries_geojson = "data/Borough Boundaries.geojson"

# Property path of the borough name in each boundary feature
feature_id_key = "properties.boro_name"

# Sale date format tried first; common layouts are always accepted
date_format = "%Y-%m-%d"

# Field separator of the sales CSV
delimiter = ","

[dashboard]
# Neighborhoods shown in the top and bottom bar charts
top_n = 5
bottom_n = 5

# Largest page served by the data table endpoint
max_page_size = 1000

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8086

# Allowed CORS origins (empty allows any origin)
cors_origins = []

# Enable the export endpoint
enable_export = true

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/borough-sales/borough-sales.log"
"#
    .to_string()
}
