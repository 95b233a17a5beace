//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Batch runner (runs, item outcomes, in-flight operations, duration)
//! - Helpdesk backend requests

use once_cell::sync::Lazy;
use prometheus::{
    Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
};

// =============================================================================
// Batch Runner Metrics
// =============================================================================

/// Batch runs started.
pub static BATCH_RUNS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("triage_batch_runs_total", "Total batch runs started").unwrap()
});

/// Batch items by terminal outcome.
pub static BATCH_ITEMS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "triage_batch_items_total",
            "Total batch items reaching a terminal outcome",
        ),
        &["outcome"], // "success", "failure"
    )
    .unwrap()
});

/// Operations currently in flight across all runners.
pub static BATCH_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "triage_batch_in_flight",
        "Number of batch operations currently in flight",
    )
    .unwrap()
});

/// Batch duration in seconds.
pub static BATCH_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("triage_batch_duration_seconds", "Duration of a batch run")
            .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
    )
    .unwrap()
});

// =============================================================================
// Backend Metrics
// =============================================================================

/// Backend requests by endpoint and result.
pub static BACKEND_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("triage_backend_requests_total", "Total helpdesk backend requests"),
        &["endpoint", "result"], // result: "success", "failure"
    )
    .unwrap()
});

/// Backend request duration in seconds.
pub static BACKEND_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "triage_backend_request_duration_seconds",
            "Duration of helpdesk backend requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["endpoint"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Batch
        Box::new(BATCH_RUNS.clone()),
        Box::new(BATCH_ITEMS.clone()),
        Box::new(BATCH_IN_FLIGHT.clone()),
        Box::new(BATCH_DURATION.clone()),
        // Backend
        Box::new(BACKEND_REQUESTS.clone()),
        Box::new(BACKEND_REQUEST_DURATION.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::Registry;

    #[test]
    fn test_all_metrics_register() {
        let registry = Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
        BATCH_ITEMS.with_label_values(&["success"]).inc();
        let names: Vec<_> = registry
            .gather()
            .iter()
            .map(|f| f.get_name().to_string())
            .collect();
        assert!(names.contains(&"triage_batch_items_total".to_string()));
    }

    #[test]
    fn test_batch_duration_is_unlabelled_histogram() {
        let registry = Registry::new();
        registry.register(Box::new(BATCH_DURATION.clone())).unwrap();
        BATCH_DURATION.observe(0.25);

        let families = registry.gather();
        let family = families
            .iter()
            .find(|f| f.get_name() == "triage_batch_duration_seconds")
            .unwrap();
        assert_eq!(family.get_metric().len(), 1);
        let metric = &family.get_metric()[0];
        assert!(metric.get_label().is_empty());
        assert!(metric.get_histogram().get_sample_count() >= 1);
    }
}
