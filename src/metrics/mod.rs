//! Prometheus metrics for filter activity.
//!
//! # Metrics Exposed
//!
//! - `fauxtoshop_filter_runs_total{filter}` - Filters applied
//! - `fauxtoshop_pixels_processed_total{filter}` - Output pixels produced
//! - `fauxtoshop_filter_duration_seconds{filter}` - Time per filter run
//! - `fauxtoshop_comparisons_total` - Image comparisons performed
//! - `fauxtoshop_last_diff_pixels` - Differing pixels in the latest comparison
//!
//! # Example
//!
//! ```
//! use fauxtoshop::metrics::MetricsRegistry;
//! use std::time::Duration;
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//! registry.record_filter("edges", 640 * 480, Duration::from_millis(12));
//! assert!(registry.encode().unwrap().contains("fauxtoshop_filter_runs_total"));
//! ```

mod collector;

pub use collector::{MetricsError, MetricsRegistry};
