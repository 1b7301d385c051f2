//! Metrics collection and registry.

use crate::diff::DiffReport;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Registration or encoding failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Prometheus registry for filter and comparison activity.
pub struct MetricsRegistry {
    registry: Registry,

    // Filter metrics
    filter_runs_total: IntCounterVec,
    pixels_processed_total: IntCounterVec,
    filter_duration_seconds: HistogramVec,

    // Comparison metrics
    comparisons_total: IntCounter,
    last_diff_pixels: IntGauge,
}

impl MetricsRegistry {
    /// Creates a registry with every metric registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let filter_runs_total = IntCounterVec::new(
            Opts::new("fauxtoshop_filter_runs_total", "Filters applied, by filter"),
            &["filter"],
        )?;
        let pixels_processed_total = IntCounterVec::new(
            Opts::new(
                "fauxtoshop_pixels_processed_total",
                "Output pixels produced, by filter",
            ),
            &["filter"],
        )?;
        let filter_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "fauxtoshop_filter_duration_seconds",
                "Wall time spent applying a filter",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["filter"],
        )?;

        let comparisons_total = IntCounter::new(
            "fauxtoshop_comparisons_total",
            "Image comparisons performed",
        )?;
        let last_diff_pixels = IntGauge::new(
            "fauxtoshop_last_diff_pixels",
            "Differing pixels found by the most recent comparison",
        )?;

        registry.register(Box::new(filter_runs_total.clone()))?;
        registry.register(Box::new(pixels_processed_total.clone()))?;
        registry.register(Box::new(filter_duration_seconds.clone()))?;
        registry.register(Box::new(comparisons_total.clone()))?;
        registry.register(Box::new(last_diff_pixels.clone()))?;

        Ok(Self {
            registry,
            filter_runs_total,
            pixels_processed_total,
            filter_duration_seconds,
            comparisons_total,
            last_diff_pixels,
        })
    }

    /// Records one filter application.
    pub fn record_filter(&self, filter: &str, pixels: usize, elapsed: Duration) {
        self.filter_runs_total.with_label_values(&[filter]).inc();
        self.pixels_processed_total
            .with_label_values(&[filter])
            .inc_by(pixels as u64);
        self.filter_duration_seconds
            .with_label_values(&[filter])
            .observe(elapsed.as_secs_f64());
    }

    /// Records one comparison.
    pub fn record_diff(&self, report: &DiffReport) {
        self.comparisons_total.inc();
        self.last_diff_pixels.set(report.count() as i64);
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
