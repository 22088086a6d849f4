//! Response envelope shared by every route.
//!
//! Every response body, success or error, is `{"status": ..., "message": ...}`
//! with `Content-Type: application/json`. Handlers and middleware never
//! return bare framework errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Envelope status field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
    Healthy,
}

/// Wire-level result returned for every route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: Status,
    pub message: String,
}

impl ApiResponse {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Build a complete response with the given HTTP status.
    pub fn with_code(self, code: StatusCode) -> Response {
        (code, Json(self)).into_response()
    }

    pub fn success(message: impl Into<String>) -> Response {
        Self::new(Status::Success, message).with_code(StatusCode::OK)
    }

    pub fn error(code: StatusCode, message: impl Into<String>) -> Response {
        Self::new(Status::Error, message).with_code(code)
    }
}

/// Fallback for routes whose method router has no matching method.
pub async fn method_not_allowed() -> Response {
    ApiResponse::error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// Fallback for unknown paths.
pub async fn not_found() -> Response {
    ApiResponse::error(StatusCode::NOT_FOUND, "Not found")
}
