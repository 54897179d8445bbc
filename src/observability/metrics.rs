//! Metrics collection and exposition.
//!
//! # Metrics
//! - `query_requests_total` (counter): requests by `outcome`
//! - `query_resolve_duration_seconds` (histogram): time spent in the engine
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Result of one `/execute` request, used as the `outcome` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Resolved,
    MissingQuery,
    InvalidQuery,
    NoMatch,
    TypeMismatch,
    Error,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Resolved => "resolved",
            Outcome::MissingQuery => "missing_query",
            Outcome::InvalidQuery => "invalid_query",
            Outcome::NoMatch => "no_match",
            Outcome::TypeMismatch => "type_mismatch",
            Outcome::Error => "error",
        }
    }
}

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Count a finished request.
pub fn record_request(outcome: Outcome) {
    metrics::counter!("query_requests_total", "outcome" => outcome.as_str()).increment(1);
}

/// Record how long a resolve call took.
pub fn record_resolve(start: Instant) {
    metrics::histogram!("query_resolve_duration_seconds").record(start.elapsed().as_secs_f64());
}
