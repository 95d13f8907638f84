//! Metrics collection and exposition.
//!
//! # Metrics
//! - `apidoc_calls_recorded_total` (counter): calls stored for documentation
//! - `apidoc_calls_duplicate_total` (counter): calls dropped as equivalent
//! - `apidoc_calls_discarded_total` (counter): exchanges never queued, by reason
//! - `apidoc_write_failures_total` (counter): failed writes, by target
//! - `apidoc_apis` (gauge): distinct (verb, path) pairs documented
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - The Prometheus exporter is opt-in for embedding applications

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_call_stored(api_count: usize) {
    counter!("apidoc_calls_recorded_total").increment(1);
    gauge!("apidoc_apis").set(api_count as f64);
}

pub fn record_call_duplicate() {
    counter!("apidoc_calls_duplicate_total").increment(1);
}

/// `reason` is one of `status`, `icon`, `queue_full`, `too_large`,
/// `body_error`, `incomplete`.
pub fn record_call_discarded(reason: &'static str) {
    counter!("apidoc_calls_discarded_total", "reason" => reason).increment(1);
}

/// `target` is `json` or `html`.
pub fn record_write_failure(target: &'static str) {
    counter!("apidoc_write_failures_total", "target" => target).increment(1);
}
