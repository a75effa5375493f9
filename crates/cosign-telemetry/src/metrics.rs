//! Prometheus metrics for the document workflow.
//!
//! All metrics follow the naming convention: `cs_<component>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., documents_created_total)
//! - **Gauge**: Value that can go up or down (e.g., documents)
//! - **Histogram**: Distribution of values (e.g., content_store_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // REGISTRY METRICS
    // =========================================================================

    /// Documents registered
    pub static ref DOCUMENTS_CREATED: IntCounter = IntCounter::new(
        "cs_registry_documents_created_total",
        "Total number of documents registered"
    ).expect("metric creation failed");

    /// Documents currently held by the store
    pub static ref DOCUMENTS_STORED: IntGauge = IntGauge::new(
        "cs_registry_documents",
        "Number of documents in the document store"
    ).expect("metric creation failed");

    // =========================================================================
    // SIGNING METRICS
    // =========================================================================

    /// Signatures appended
    pub static ref SIGNATURES_APPENDED: IntCounter = IntCounter::new(
        "cs_signing_signatures_total",
        "Total number of signatures appended to documents"
    ).expect("metric creation failed");

    /// Documents that reached completion
    pub static ref DOCUMENTS_COMPLETED: IntCounter = IntCounter::new(
        "cs_signing_documents_completed_total",
        "Total number of documents signed by every required signer"
    ).expect("metric creation failed");

    // =========================================================================
    // CONTENT STORE METRICS
    // =========================================================================

    /// Content store round-trip duration
    pub static ref CONTENT_STORE_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "cs_content_store_duration_seconds",
            "Time spent waiting on the content store"
        ).buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0]),
        &["operation"]  // operation: put/get
    ).expect("metric creation failed");

    // =========================================================================
    // ERROR METRICS
    // =========================================================================

    /// Rejected operations by operation and error kind
    pub static ref REJECTED_OPERATIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("cs_rejected_operations_total", "Rejected workflow operations"),
        &["operation", "kind"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Calling this more than once is harmless.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(DOCUMENTS_CREATED.clone()),
        Box::new(DOCUMENTS_STORED.clone()),
        Box::new(SIGNATURES_APPENDED.clone()),
        Box::new(DOCUMENTS_COMPLETED.clone()),
        Box::new(CONTENT_STORE_DURATION.clone()),
        Box::new(REJECTED_OPERATIONS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
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

/// Record a rejected operation.
pub fn record_rejection(operation: &str, kind: &str) {
    REJECTED_OPERATIONS
        .with_label_values(&[operation, kind])
        .inc();
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing a content store operation. Observation happens on drop.
pub fn time_content_store(operation: &str) -> HistogramTimer {
    HistogramTimer::new(&CONTENT_STORE_DURATION.with_label_values(&[operation]))
}
