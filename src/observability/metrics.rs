//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): by method, status, backend
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_failover_total` (counter): failover attempts by group
//! - `gateway_unroutable_total` (counter): requests with no matching group

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics endpoint started"),
        Err(err) => tracing::error!(error = %err, "failed to start metrics endpoint"),
    }
}

/// Record one completed (or failed) gateway request.
pub fn record_request(method: &str, status: u16, backend: &str, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "backend" => backend.to_string()
    )
    .increment(1);
    histogram!(
        "gateway_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a failover attempt against a group.
pub fn record_failover(group: &str) {
    counter!("gateway_failover_total", "group" => group.to_string()).increment(1);
}

/// Record an unroutable request.
pub fn record_unroutable(method: &str) {
    counter!("gateway_unroutable_total", "method" => method.to_string()).increment(1);
}
