// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the view synchronizer.
//!
//! All metrics use the `viewsync_` prefix.
//!
//! # Metrics Categories
//!
//! - **Pass Metrics** - Outcome and duration of each reconciliation pass
//! - **Mutation Metrics** - Every management API write and whether it succeeded
//! - **State Metrics** - Size of the desired and live network mappings
//!
//! # Example
//!
//! ```rust,no_run
//! use viewsync::metrics::{gather_metrics, record_pass};
//!
//! record_pass("applied", std::time::Duration::from_secs(1));
//! let text = gather_metrics().unwrap();
//! ```

use prometheus::{
    CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all metrics
const METRICS_NAMESPACE: &str = "viewsync";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry and exposed via `/metrics` endpoint.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Pass Metrics
// ============================================================================

/// Total number of reconciliation passes by outcome
///
/// Labels:
/// - `outcome`: `applied`, `aborted` or `failed`
pub static PASSES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_passes_total"),
        "Total number of reconciliation passes by outcome",
    );
    let counter = CounterVec::new(opts, &["outcome"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of reconciliation passes in seconds
pub static PASS_DURATION_SECONDS: LazyLock<Histogram> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_pass_duration_seconds"),
        "Duration of reconciliation passes in seconds",
    )
    .buckets(vec![0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 300.0]);
    let histogram = Histogram::with_opts(opts).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// Mutation Metrics
// ============================================================================

/// Total number of management API writes
///
/// Labels:
/// - `action`: `create_view`, `set_network`, `reset_network`, `delete_view`
/// - `status`: `success` or `error`
pub static MUTATIONS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_mutations_total"),
        "Total number of management API writes by action and status",
    );
    let counter = CounterVec::new(opts, &["action", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// State Metrics
// ============================================================================

/// Networks in the most recent desired mapping
pub static DESIRED_NETWORKS: LazyLock<Gauge> = LazyLock::new(|| {
    let gauge = Gauge::new(
        format!("{METRICS_NAMESPACE}_desired_networks"),
        "Networks in the most recent desired mapping",
    )
    .unwrap();
    METRICS_REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
});

/// Networks mapped on the server at the most recent live read
pub static LIVE_NETWORKS: LazyLock<Gauge> = LazyLock::new(|| {
    let gauge = Gauge::new(
        format!("{METRICS_NAMESPACE}_live_networks"),
        "Networks mapped on the server at the most recent live read",
    )
    .unwrap();
    METRICS_REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record the outcome of a pass
///
/// # Arguments
/// * `outcome` - `applied`, `aborted` or `failed`
/// * `duration` - Time the pass took
pub fn record_pass(outcome: &str, duration: Duration) {
    PASSES_TOTAL.with_label_values(&[outcome]).inc();
    PASS_DURATION_SECONDS.observe(duration.as_secs_f64());
}

/// Record a management API write
///
/// # Arguments
/// * `action` - Kind of mutation
/// * `success` - Whether the server accepted it
pub fn record_mutation(action: &str, success: bool) {
    let status = if success { "success" } else { "error" };
    MUTATIONS_TOTAL.with_label_values(&[action, status]).inc();
}

/// Record the sizes of the desired and live mappings
#[allow(clippy::cast_precision_loss)]
pub fn set_network_counts(desired: usize, live: usize) {
    DESIRED_NETWORKS.set(desired as f64);
    LIVE_NETWORKS.set(live as f64);
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_pass() {
        let before = PASSES_TOTAL.with_label_values(&["applied"]).get();

        record_pass("applied", Duration::from_millis(250));

        let after = PASSES_TOTAL.with_label_values(&["applied"]).get();
        assert!(after >= before + 1.0);
        assert!(PASS_DURATION_SECONDS.get_sample_count() >= 1);
    }

    #[test]
    fn test_record_mutation() {
        let before = MUTATIONS_TOTAL
            .with_label_values(&["delete_view", "error"])
            .get();

        record_mutation("delete_view", false);

        let after = MUTATIONS_TOTAL
            .with_label_values(&["delete_view", "error"])
            .get();
        assert!(after >= before + 1.0);
    }

    #[test]
    fn test_gather_metrics_contains_prefix() {
        record_mutation("create_view", true);
        set_network_counts(3, 2);

        let text = gather_metrics().unwrap();
        assert!(text.contains("viewsync_mutations_total"));
        assert!(text.contains("viewsync_desired_networks"));
    }
}
