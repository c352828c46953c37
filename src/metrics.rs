//! Prometheus metrics for the filtering service.
//!
//! Covers filtering runs, remote relevance outcomes, and upload sizes.
//! Registration is explicit via [`init_metrics`]; `/metrics` serves the text
//! exposition from [`gather_metrics`].

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Histogram, HistogramOpts, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    /// Total number of filtering runs processed
    pub static ref FILTER_RUNS_TOTAL: Counter = Counter::with_opts(
        Opts::new("filter_runs_total", "Total number of filtering runs")
            .namespace("llm_log_sifter")
    ).expect("Failed to create FILTER_RUNS_TOTAL metric");

    /// Filtering run duration in seconds (local + remote + merge)
    pub static ref FILTER_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "filter_duration_seconds",
            "End-to-end filtering run duration in seconds"
        )
        .namespace("llm_log_sifter")
        .buckets(vec![0.005, 0.025, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
    ).expect("Failed to create FILTER_DURATION_SECONDS metric");

    /// Remote relevance calls by outcome
    ///
    /// Labels: outcome (matched, failed, timeout, unavailable)
    pub static ref REMOTE_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(
            "remote_requests_total",
            "Remote relevance calls by outcome"
        )
        .namespace("llm_log_sifter"),
        &["outcome"]
    ).expect("Failed to create REMOTE_REQUESTS_TOTAL metric");

    /// Number of lines in each FilterResult
    pub static ref RESULT_LINES: Histogram = Histogram::with_opts(
        HistogramOpts::new("result_lines", "Number of lines in each filter result")
            .namespace("llm_log_sifter")
            .buckets(prometheus::exponential_buckets(1.0, 4.0, 8).unwrap()),
    ).expect("Failed to create RESULT_LINES metric");

    /// Size of uploaded log files in bytes
    pub static ref UPLOAD_BYTES: Histogram = Histogram::with_opts(
        HistogramOpts::new("upload_bytes", "Size of uploaded log files in bytes")
            .namespace("llm_log_sifter")
            .buckets(prometheus::exponential_buckets(256.0, 8.0, 8).unwrap()),
    ).expect("Failed to create UPLOAD_BYTES metric");
}

/// Register all metrics with the global registry.
///
/// Call once at startup; a second call returns an `AlreadyReg` error.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    PROMETHEUS_REGISTRY.register(Box::new(FILTER_RUNS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(FILTER_DURATION_SECONDS.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(REMOTE_REQUESTS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(RESULT_LINES.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(UPLOAD_BYTES.clone()))?;
    Ok(())
}

/// Gather all metrics in Prometheus text exposition format.
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}
