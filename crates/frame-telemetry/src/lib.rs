//! # Frame Telemetry
//!
//! Log output for processes hosting Frame-Bus contexts.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use frame_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_logging(&config).expect("Failed to init logging");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `frame-bus` | Service name in log lines |
//! | `FB_LOG_LEVEL` | `info` | Log level filter |
//! | `FB_CONSOLE_OUTPUT` | `true` | Write logs to the console |
//! | `FB_JSON_LOGS` | `false` | JSON instead of pretty output |

mod config;

pub use config::TelemetryConfig;

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter `{filter}`: {reason}")]
    Filter { filter: String, reason: String },

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Install the global `tracing` subscriber described by `config`.
///
/// `RUST_LOG` takes precedence over `config.log_level` when set.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Filter {
            filter: config.log_level.clone(),
            reason: e.to_string(),
        })?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if !config.console_output {
        registry.try_init()
    } else if config.json_logs {
        // JSON output for log collectors
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
    } else {
        // Pretty output for development
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_ansi(true),
            )
            .try_init()
    };
    result.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

    tracing::info!(service = %config.service_name, "Logging initialized");
    Ok(())
}

/// Install test logging once per process; later calls are no-ops.
pub fn init_test_logging() {
    let _ = init_logging(&TelemetryConfig::for_tests());
}
