//! `POST /contact` handler.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::Response,
};

use crate::contact::validation::{validate, Submission};
use crate::http::request::RequestContext;
use crate::http::response::ApiResponse;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::security::client_ip::request_identity;

pub const SUCCESS_MESSAGE: &str = "Inquiry received. We will be in touch shortly.";

/// Accept a contact form submission.
///
/// Method filtering happens in the router; this runs for POST only.
pub async fn submit(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = RequestContext::request_id(request.extensions()).to_string();
    let client_ip = request_identity(&request);
    let max_body = state.config.limits.max_body_bytes;

    if declared_length(&request).is_some_and(|len| len > max_body as u64) {
        metrics::record_submission("too_large");
        return ApiResponse::error(StatusCode::PAYLOAD_TOO_LARGE, "Request too large");
    }

    let mut submission = match decode(request.into_body(), max_body).await {
        Ok(submission) => submission,
        Err(error) => {
            tracing::warn!(
                error = %error,
                remote_ip = %client_ip,
                request_id = %request_id,
                "Failed to decode request body"
            );
            metrics::record_submission("malformed");
            return ApiResponse::error(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    if let Err(reason) = validate(&mut submission, &state.config.limits) {
        metrics::record_submission("invalid");
        return ApiResponse::error(StatusCode::BAD_REQUEST, reason.to_string());
    }

    tracing::info!(
        name = %submission.name,
        email = %submission.email,
        message_length = submission.message.len(),
        remote_ip = %client_ip,
        request_id = %request_id,
        "New inquiry received"
    );
    metrics::record_submission("accepted");

    // TODO: forward accepted inquiries by email once an SMTP provider is chosen.

    ApiResponse::success(SUCCESS_MESSAGE)
}

fn declared_length(request: &Request<Body>) -> Option<u64> {
    request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

#[derive(Debug, thiserror::Error)]
enum DecodeError {
    #[error("failed to read body: {0}")]
    Read(#[from] axum::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read at most `limit` bytes and decode them. Bodies longer than the limit
/// fail the read rather than being truncated into valid JSON.
async fn decode(body: Body, limit: usize) -> Result<Submission, DecodeError> {
    let bytes = axum::body::to_bytes(body, limit).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
