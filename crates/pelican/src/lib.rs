//! # Pelican
//!
//! *"The vessel that watches itself"*
//!
//! Pelican provides observability for the Epitome stack: structured
//! logging configuration and request-level metrics counters.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::ServiceMetrics;

/// Configuration for telemetry.
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    /// Service name included in log lines.
    pub service_name: String,
    /// Log level.
    pub log_level: String,
    /// Enable JSON logging.
    pub json_logs: bool,
}

impl TelemetryConfig {
    /// Creates a new telemetry configuration.
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// Sets the log level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enables JSON logging.
    #[must_use]
    pub fn with_json_logs(mut self) -> Self {
        self.json_logs = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = TelemetryConfig::new("epitome")
            .with_log_level("debug")
            .with_json_logs();

        assert_eq!(config.service_name, "epitome");
        assert_eq!(config.log_level, "debug");
        assert!(config.json_logs);
    }
}
