//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ersatz_requests_total` (counter): requests by method, status, kind
//! - `ersatz_request_duration_seconds` (histogram): time spent serving
//! - `ersatz_variant_changes_total` (counter): control commands by result
//! - `ersatz_endpoints_loaded` (gauge): endpoints in the registry

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Which part of the server answered a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Mock,
    Miss,
    Control,
}

impl RequestKind {
    fn as_str(self) -> &'static str {
        match self {
            RequestKind::Mock => "mock",
            RequestKind::Miss => "miss",
            RequestKind::Control => "control",
        }
    }
}

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Label value for a request method. Methods that can never match an
/// endpoint share one series.
fn method_label(method: &Method) -> &'static str {
    match method.as_str() {
        "GET" => "GET",
        "HEAD" => "HEAD",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "PATCH" => "PATCH",
        "OPTIONS" => "OPTIONS",
        "TRACE" => "TRACE",
        _ => "other",
    }
}

pub fn record_request(method: &Method, status: u16, kind: RequestKind, start: Instant) {
    counter!(
        "ersatz_requests_total",
        "method" => method_label(method),
        "status" => status.to_string(),
        "kind" => kind.as_str()
    )
    .increment(1);
    histogram!("ersatz_request_duration_seconds", "kind" => kind.as_str())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_variant_change(result: &'static str) {
    counter!("ersatz_variant_changes_total", "result" => result).increment(1);
}

pub fn record_endpoints_loaded(count: usize) {
    gauge!("ersatz_endpoints_loaded").set(count as f64);
}
