//! Metrics collection and exposition.
//!
//! # Metrics
//! - `engine_requests_total` (counter): requests by method, status, module
//! - `engine_request_duration_seconds` (histogram): dispatch latency
//!
//! # Design Decisions
//! - Labels carry the resolved module, not the raw path, to keep
//!   cardinality bounded
//! - The Prometheus endpoint is optional and bound separately from
//!   the main listener

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and HTTP endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "failed to start metrics endpoint"),
    }
}

/// Record one handled request.
pub fn record_request(method: &str, status: u16, module: &str, start: Instant) {
    metrics::counter!(
        "engine_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "module" => module.to_string(),
    )
    .increment(1);

    metrics::histogram!(
        "engine_request_duration_seconds",
        "method" => method.to_string(),
    )
    .record(start.elapsed().as_secs_f64());
}
