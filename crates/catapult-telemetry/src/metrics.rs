//! Prometheus metrics for the transaction pipeline.
//!
//! All metrics follow the naming convention: `catapult_<component>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Registry holding every pipeline metric
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // TRANSACTIONS
    // =========================================================================

    /// Transactions executed, by outcome
    pub static ref TRANSACTIONS_EXECUTED: CounterVec = CounterVec::new(
        Opts::new("catapult_executor_transactions_total", "Transactions executed"),
        &["outcome"]  // outcome: success/rejected/decode_error
    ).expect("metric creation failed");

    /// Validation failures by result facility
    pub static ref VALIDATION_FAILURES: CounterVec = CounterVec::new(
        Opts::new("catapult_validator_failures_total", "Validation failures by facility"),
        &["facility"]
    ).expect("metric creation failed");

    /// Notifications published by transaction plugins
    pub static ref NOTIFICATIONS_PUBLISHED: Counter = Counter::new(
        "catapult_publisher_notifications_total",
        "Total notifications published"
    ).expect("metric creation failed");

    // =========================================================================
    // BLOCKS
    // =========================================================================

    /// Blocks committed to the cache
    pub static ref BLOCKS_COMMITTED: Counter = Counter::new(
        "catapult_chain_blocks_committed_total",
        "Total blocks committed"
    ).expect("metric creation failed");

    /// Blocks undone
    pub static ref BLOCKS_ROLLED_BACK: Counter = Counter::new(
        "catapult_chain_blocks_rolled_back_total",
        "Total blocks rolled back"
    ).expect("metric creation failed");

    /// Current cache height
    pub static ref CHAIN_HEIGHT: Gauge = Gauge::new(
        "catapult_chain_height",
        "Height of the last committed block"
    ).expect("metric creation failed");

    /// Block execution duration
    pub static ref BLOCK_EXECUTION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "catapult_executor_block_duration_seconds",
            "Time spent executing blocks"
        ).buckets(exponential_buckets(0.0001, 2.0, 15).expect("valid buckets"))
    ).expect("metric creation failed");
}

/// Register all metrics with [`REGISTRY`].
///
/// Fails when called twice.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(TRANSACTIONS_EXECUTED.clone()),
        Box::new(VALIDATION_FAILURES.clone()),
        Box::new(NOTIFICATIONS_PUBLISHED.clone()),
        Box::new(BLOCKS_COMMITTED.clone()),
        Box::new(BLOCKS_ROLLED_BACK.clone()),
        Box::new(CHAIN_HEIGHT.clone()),
        Box::new(BLOCK_EXECUTION_DURATION.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Observes the elapsed time into a histogram on drop.
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
