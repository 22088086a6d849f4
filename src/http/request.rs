//! Request identification.
//!
//! # Responsibilities
//! - Reuse a caller-supplied `X-Request-ID`, or generate one
//! - Attach it to the request as [`RequestContext`] for handlers and logs
//! - Echo it on every response
//!
//! # Design Decisions
//! - Request ID added as early as possible so every later stage can log it
//! - Generated IDs are UUID v7: time-ordered with a random tail. Collisions
//!   are not cryptographically ruled out.

use axum::{
    body::Body,
    http::{Extensions, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Per-request correlation data, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
}

impl RequestContext {
    /// Request ID attached to `extensions`, or an empty string when the
    /// request did not pass through [`request_id_middleware`].
    pub fn request_id(extensions: &Extensions) -> &str {
        extensions
            .get::<RequestContext>()
            .map(|ctx| ctx.request_id.as_str())
            .unwrap_or_default()
    }
}

/// Generate a new request identifier.
pub fn generate_request_id() -> String {
    Uuid::now_v7().to_string()
}

/// Outermost middleware stage: tags the request and its response.
pub async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let supplied = request
        .headers()
        .get(X_REQUEST_ID)
        .filter(|value| !value.is_empty())
        .cloned();

    let header_value = match supplied {
        Some(value) => value,
        None => {
            let value = HeaderValue::try_from(generate_request_id())
                .expect("hyphenated UUID is a valid header value");
            request.headers_mut().insert(X_REQUEST_ID, value.clone());
            value
        }
    };

    // Opaque bytes are echoed as sent; logs get a lossy UTF-8 rendering.
    let request_id = String::from_utf8_lossy(header_value.as_bytes()).into_owned();
    request.extensions_mut().insert(RequestContext { request_id });

    let mut response = next.run(request).await;
    response.headers_mut().insert(X_REQUEST_ID, header_value);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    async fn echo_context(request: Request<Body>) -> String {
        RequestContext::request_id(request.extensions()).to_string()
    }

    fn app() -> Router {
        Router::new()
            .route("/", get(echo_context))
            .layer(middleware::from_fn(request_id_middleware))
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn reuses_caller_supplied_id() {
        let request = Request::builder()
            .uri("/")
            .header(X_REQUEST_ID, "abc-123")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.headers()[X_REQUEST_ID], "abc-123");
        assert_eq!(body_string(response).await, "abc-123");
    }

    #[tokio::test]
    async fn echoes_non_ascii_caller_id_verbatim() {
        let supplied = HeaderValue::from_bytes(b"trace-caf\xc3\xa9").unwrap();
        let request = Request::builder()
            .uri("/")
            .header(X_REQUEST_ID, supplied.clone())
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.headers()[X_REQUEST_ID], supplied);
        assert_eq!(body_string(response).await, "trace-caf\u{e9}");
    }

    #[tokio::test]
    async fn generates_id_when_absent() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let response = app().oneshot(request).await.unwrap();
        let header = response.headers()[X_REQUEST_ID].to_str().unwrap().to_string();
        assert!(Uuid::parse_str(&header).is_ok());
        assert_eq!(body_string(response).await, header);
    }

    #[tokio::test]
    async fn empty_header_is_replaced() {
        let request = Request::builder()
            .uri("/")
            .header(X_REQUEST_ID, "")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert!(!response.headers()[X_REQUEST_ID].is_empty());
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(generate_request_id(), generate_request_id());
    }
}
