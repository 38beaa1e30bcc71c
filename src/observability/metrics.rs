//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): relayed requests by route, status
//! - `relay_request_duration_seconds` (histogram): end-to-end latency by route
//! - `relay_upstream_calls_total` (counter): provider calls by provider, outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished relay request.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!("relay_requests_total", "route" => route, "status" => status.to_string()).increment(1);
    histogram!("relay_request_duration_seconds", "route" => route).record(start.elapsed().as_secs_f64());
}

/// Record the outcome of one provider call.
pub fn record_upstream(provider: &'static str, outcome: &'static str) {
    counter!("relay_upstream_calls_total", "provider" => provider, "outcome" => outcome).increment(1);
}
