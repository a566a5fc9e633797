//! Metrics collection and exposition.
//!
//! # Metrics
//! - `jsonapi_requests_total` (counter): requests by operation, status
//! - `jsonapi_request_duration_seconds` (histogram): engine round-trip latency
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus endpoint only when enabled in config

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::OperationKind;

/// Install the Prometheus exporter with its own scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| e.to_string())?;

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one forwarded request.
pub fn record_request(operation: OperationKind, status: u16, start: Instant) {
    metrics::counter!(
        "jsonapi_requests_total",
        "operation" => operation.as_str(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "jsonapi_request_duration_seconds",
        "operation" => operation.as_str()
    )
    .record(start.elapsed().as_secs_f64());
}
