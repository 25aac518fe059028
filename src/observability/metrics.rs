//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dispatcher_requests_total` (counter): dispatches by transport, outcome
//! - `dispatcher_request_duration_seconds` (histogram): dispatch latency
//! - `dispatcher_rejected_total` (counter): specs failing validation

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished dispatch.
pub fn record_dispatch(transport: &'static str, outcome: &'static str, started: Instant) {
    metrics::counter!(
        "dispatcher_requests_total",
        "transport" => transport,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("dispatcher_request_duration_seconds", "transport" => transport)
        .record(started.elapsed().as_secs_f64());
}

/// Record a spec rejected before any transport ran.
pub fn record_rejected() {
    metrics::counter!("dispatcher_rejected_total").increment(1);
}
