//! Telemetry configuration from environment variables.

use std::env;

/// Logging and metrics settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log filter directive (`info`, `cc_06_pipeline=debug`, ...)
    pub log_level: String,

    /// JSON formatted logs instead of human readable ones
    pub json_logs: bool,

    /// Include file and line of each event
    pub with_source_location: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "catapult".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_source_location: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CATAPULT_SERVICE_NAME`: Service name (default: catapult)
    /// - `CATAPULT_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `CATAPULT_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `CATAPULT_LOG_SOURCE`: Include source locations (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            service_name: lookup("CATAPULT_SERVICE_NAME").unwrap_or(defaults.service_name),
            log_level: lookup("CATAPULT_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            json_logs: lookup("CATAPULT_JSON_LOGS").map_or(defaults.json_logs, |value| is_enabled(&value)),
            with_source_location: lookup("CATAPULT_LOG_SOURCE")
                .map_or(defaults.with_source_location, |value| is_enabled(&value)),
        }
    }
}

fn is_enabled(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
