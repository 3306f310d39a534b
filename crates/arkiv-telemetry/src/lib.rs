//! # Arkiv Telemetry
//!
//! Structured logging and Prometheus metrics shared by every Arkiv crate.
//!
//! ## Components
//!
//! - **Logging**: a global `tracing` subscriber, JSON or human-readable
//! - **Metrics**: process-wide Prometheus counters, gauges and histograms
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arkiv_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     // ...
//!     println!("{}", arkiv_telemetry::encode_metrics().unwrap());
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ARKIV_SERVICE_NAME` | `arkiv-client` | Service name in logs |
//! | `ARKIV_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `ARKIV_JSON_LOGS` | `false` | JSON output |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{init_logging, LoggingGuard};
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, MetricsHandle, ACTIVE_FILTERS,
    CALLBACK_FAILURES, EVENTS_DISPATCHED, POLL_ERRORS, QUERY_PAGES_FETCHED, QUERY_PAGE_DURATION,
    TRANSACTIONS_FAILED, TRANSACTIONS_SUBMITTED, TRANSACTION_DURATION,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install logging and register metrics.
///
/// Hold the returned guard for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    let logging = init_logging(&config)?;

    Ok(TelemetryGuard {
        _logging: logging,
        _metrics: metrics,
    })
}

/// Keeps telemetry active.
pub struct TelemetryGuard {
    _logging: LoggingGuard,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry");
    }
}

/// Increment a counter, optionally with label values.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
