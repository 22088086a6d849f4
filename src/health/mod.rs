//! Liveness endpoint.
//!
//! `GET /health` reports a fixed status. It has no dependencies, so a 200
//! only means the process is accepting and serving requests.

use axum::{http::StatusCode, response::Response};

use crate::http::response::{ApiResponse, Status};

pub async fn check() -> Response {
    ApiResponse::new(Status::Healthy, "Service is running").with_code(StatusCode::OK)
}
