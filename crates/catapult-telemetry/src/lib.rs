//! # Catapult Telemetry
//!
//! Structured logging and Prometheus metrics for the transaction pipeline.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catapult_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     init_telemetry(&TelemetryConfig::from_env()).expect("telemetry starts");
//!     // spans and metrics recorded by the pipeline are now collected
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CATAPULT_SERVICE_NAME` | `catapult` | Service name in logs |
//! | `CATAPULT_LOG_LEVEL` | `info` | Log filter (falls back to `RUST_LOG`) |
//! | `CATAPULT_JSON_LOGS` | `false` | JSON formatted logs |
//! | `CATAPULT_LOG_SOURCE` | `false` | File and line in log lines |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging};
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, BLOCKS_COMMITTED, BLOCKS_ROLLED_BACK,
    BLOCK_EXECUTION_DURATION, CHAIN_HEIGHT, NOTIFICATIONS_PUBLISHED, TRANSACTIONS_EXECUTED, VALIDATION_FAILURES,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Registers metrics, then installs the logging subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}
