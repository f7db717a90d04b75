//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_dispatch_total` (counter): dispatched requests by `outcome`
//!   (`matched`, `not_found`, `method_not_allowed`, `options`, `redirect`,
//!   `panic`)
//! - `router_routes` (gauge): routes registered when the service was frozen
//!
//! # Design Decisions
//! - Uses the `metrics` facade; without an installed recorder updates are
//!   discarded
//! - Prometheus exposition is opt-in from the binary

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// How the router answered a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Matched,
    NotFound,
    MethodNotAllowed,
    Options,
    Redirect,
    Panic,
}

impl DispatchOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            DispatchOutcome::Matched => "matched",
            DispatchOutcome::NotFound => "not_found",
            DispatchOutcome::MethodNotAllowed => "method_not_allowed",
            DispatchOutcome::Options => "options",
            DispatchOutcome::Redirect => "redirect",
            DispatchOutcome::Panic => "panic",
        }
    }
}

pub fn record_dispatch(outcome: DispatchOutcome) {
    metrics::counter!("router_dispatch_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_route_count(routes: usize) {
    metrics::gauge!("router_routes").set(routes as f64);
}

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}
