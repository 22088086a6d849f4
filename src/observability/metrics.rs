//! Metrics collection and exposition.
//!
//! # Metrics
//! - `contact_requests_total` (counter): requests by route, status
//! - `contact_rate_limited_total` (counter): rejections by the rate limiter
//! - `contact_submissions_total` (counter): contact outcomes
//!   (`accepted`, `invalid`, `malformed`, `too_large`)
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Route label for a request path. Unknown paths share one label.
pub fn route_label(path: &str) -> &'static str {
    match path {
        "/contact" => "/contact",
        "/health" => "/health",
        _ => "other",
    }
}

pub fn record_request(route: &'static str, status: u16) {
    ::metrics::counter!(
        "contact_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_rate_limited() {
    ::metrics::counter!("contact_rate_limited_total").increment(1);
}

pub fn record_submission(outcome: &'static str) {
    ::metrics::counter!("contact_submissions_total", "outcome" => outcome).increment(1);
}

/// Middleware counting every response by route and status.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let route = route_label(request.uri().path());
    let response = next.run(request).await;
    record_request(route, response.status().as_u16());
    response
}
