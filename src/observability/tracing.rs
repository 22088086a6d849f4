//! Per-request spans.
//!
//! Spans are created by `tower_http`'s `TraceLayer` after the request-ID
//! stage has run, so every span carries the correlation ID.

use axum::{body::Body, http::Request};
use tracing::Span;

use crate::http::request::RequestContext;

pub fn make_request_span(request: &Request<Body>) -> Span {
    tracing::debug_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %RequestContext::request_id(request.extensions()),
    )
}
