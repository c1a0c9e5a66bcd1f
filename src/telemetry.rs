//! Logging setup
//!
//! Installs the global `tracing` subscriber described by [`LoggingConfig`].
//! `RUST_LOG` takes precedence over the configured level.

use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{
    layer::SubscriberExt, registry::Registry, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::config::LoggingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Errors raised while installing the subscriber
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Unknown log format '{0}' (expected pretty or json)")]
    UnknownFormat(String),

    #[error("Failed to open log file: {0}")]
    File(#[from] std::io::Error),

    #[error("Failed to install subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Filter directive used when `RUST_LOG` is unset
pub fn default_directive(config: &LoggingConfig) -> String {
    format!(
        "borough_sales={level},tower_http={level}",
        level = config.level
    )
}

/// Install the global subscriber
pub fn init_logging(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let json = match config.format.to_lowercase().as_str() {
        "pretty" | "text" => false,
        "json" => true,
        other => return Err(TelemetryError::UnknownFormat(other.to_string())),
    };

    let layer: BoxedLayer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let fmt = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            if json {
                fmt.json().boxed()
            } else {
                fmt.boxed()
            }
        }
        None => {
            let fmt = tracing_subscriber::fmt::layer();
            if json {
                fmt.json().boxed()
            } else {
                fmt.boxed()
            }
        }
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            ..Default::default()
        };
        assert_eq!(
            default_directive(&config),
            "borough_sales=debug,tower_http=debug"
        );
    }

    #[test]
    fn test_unknown_format_rejected() {
        let config = LoggingConfig {
            format: "xml".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            init_logging(&config),
            Err(TelemetryError::UnknownFormat(_))
        ));
    }
}
