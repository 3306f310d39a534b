//! Prometheus metrics for the Arkiv client.
//!
//! All metrics follow the naming convention: `arkiv_<area>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: transactions submitted, events dispatched, poll errors
//! - **Gauge**: active event filters
//! - **Histogram**: transaction round-trip and query page latency

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // TRANSACTION METRICS
    // =========================================================================

    /// Storage transactions sent
    pub static ref TRANSACTIONS_SUBMITTED: Counter = Counter::new(
        "arkiv_transactions_submitted_total",
        "Total number of storage transactions submitted"
    ).expect("metric creation failed");

    /// Storage transactions whose receipt reported failure
    pub static ref TRANSACTIONS_FAILED: Counter = Counter::new(
        "arkiv_transactions_failed_total",
        "Total number of storage transactions that reverted or failed to send"
    ).expect("metric creation failed");

    /// Send + receipt round trip
    pub static ref TRANSACTION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "arkiv_transaction_duration_seconds",
            "Time from send to decoded receipt"
        ).buckets(exponential_buckets(0.01, 2.0, 12).unwrap_or_default())
    ).expect("metric creation failed");

    // =========================================================================
    // EVENT WATCH METRICS
    // =========================================================================

    /// Events delivered to callbacks
    pub static ref EVENTS_DISPATCHED: CounterVec = CounterVec::new(
        Opts::new("arkiv_events_dispatched_total", "Events delivered to watch callbacks"),
        &["kind"]  // kind: created/updated/deleted/extended/expired/owner_changed
    ).expect("metric creation failed");

    /// Callbacks that returned an error or panicked
    pub static ref CALLBACK_FAILURES: CounterVec = CounterVec::new(
        Opts::new("arkiv_callback_failures_total", "Watch callbacks that failed"),
        &["kind"]
    ).expect("metric creation failed");

    /// Failed `get_new_entries` round trips
    pub static ref POLL_ERRORS: Counter = Counter::new(
        "arkiv_poll_errors_total",
        "Total number of failed filter polls"
    ).expect("metric creation failed");

    /// Filters currently polling
    pub static ref ACTIVE_FILTERS: Gauge = Gauge::new(
        "arkiv_active_filters",
        "Number of running event filters"
    ).expect("metric creation failed");

    // =========================================================================
    // QUERY METRICS
    // =========================================================================

    /// Result pages fetched
    pub static ref QUERY_PAGES_FETCHED: Counter = Counter::new(
        "arkiv_query_pages_fetched_total",
        "Total number of query result pages fetched"
    ).expect("metric creation failed");

    /// Single page fetch latency
    pub static ref QUERY_PAGE_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "arkiv_query_page_duration_seconds",
            "Time spent fetching one query page"
        ).buckets(exponential_buckets(0.001, 2.0, 14).unwrap_or_default())
    ).expect("metric creation failed");
}

/// Handle for the registered metric set
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Transactions
        Box::new(TRANSACTIONS_SUBMITTED.clone()),
        Box::new(TRANSACTIONS_FAILED.clone()),
        Box::new(TRANSACTION_DURATION.clone()),
        // Event watch
        Box::new(EVENTS_DISPATCHED.clone()),
        Box::new(CALLBACK_FAILURES.clone()),
        Box::new(POLL_ERRORS.clone()),
        Box::new(ACTIVE_FILTERS.clone()),
        // Queries
        Box::new(QUERY_PAGES_FETCHED.clone()),
        Box::new(QUERY_PAGE_DURATION.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Render the registry in the Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Observes elapsed time into a histogram when dropped.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Start a [`HistogramTimer`].
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
