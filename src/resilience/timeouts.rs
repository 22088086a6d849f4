//! Handler deadline.
//!
//! Bounds the time from request dispatch to a complete response. Body reads
//! have their own, separate timeout (`tower_http::timeout::RequestBodyTimeoutLayer`).

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Duration;

use crate::http::request::RequestContext;
use crate::http::response::ApiResponse;

pub async fn deadline_middleware(
    State(limit): State<Duration>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let request_id = RequestContext::request_id(request.extensions()).to_string();

    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(request_id = %request_id, timeout = ?limit, "Request timed out");
            ApiResponse::error(StatusCode::REQUEST_TIMEOUT, "Request timed out")
        }
    }
}
