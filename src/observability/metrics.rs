//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): inbound requests by method, route, status
//! - `gateway_request_duration_seconds` (histogram): inbound latency
//! - `gateway_backend_requests_total` (counter): backend calls by method, status
//! - `gateway_backend_duration_seconds` (histogram): backend call latency
//! - `gateway_backend_failures_total` (counter): backend calls that got no response
//! - `gateway_enrichment_fallbacks_total` (counter): entities served with defaults
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    ::metrics::counter!("gateway_requests_total", &labels).increment(1);
    ::metrics::histogram!("gateway_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_backend_call(method: &str, status: u16, start: Instant) {
    let labels = [("method", method.to_string()), ("status", status.to_string())];
    ::metrics::counter!("gateway_backend_requests_total", &labels).increment(1);
    ::metrics::histogram!("gateway_backend_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_backend_failure(method: &str) {
    ::metrics::counter!("gateway_backend_failures_total", "method" => method.to_string())
        .increment(1);
}

pub fn record_enrichment_fallback() {
    ::metrics::counter!("gateway_enrichment_fallbacks_total").increment(1);
}
