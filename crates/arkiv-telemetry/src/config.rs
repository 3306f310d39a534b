//! Telemetry configuration from environment variables.

use std::env;

use serde::{Deserialize, Serialize};

/// Configuration for client logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full directive
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output
    pub json_logs: bool,

    /// Colored output for the human-readable format
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "arkiv-client".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            ansi: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ARKIV_SERVICE_NAME`: Service name (default: arkiv-client)
    /// - `ARKIV_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `ARKIV_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    /// - `NO_COLOR`: Disable ANSI colors when set
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("ARKIV_SERVICE_NAME")
                .unwrap_or_else(|_| "arkiv-client".to_string()),

            log_level: env::var("ARKIV_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("ARKIV_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            ansi: env::var("NO_COLOR").is_err(),
        }
    }

    /// Same as [`from_env`](Self::from_env) with a fixed service name.
    pub fn for_service(service_name: &str) -> Self {
        let mut config = Self::from_env();
        config.service_name = service_name.to_string();
        config
    }
}
