//! Client identity resolution for rate limiting and logging.
//!
//! # Trust boundary
//! `X-Forwarded-For` and `X-Real-IP` are taken at face value. The service
//! must be deployed behind a reverse proxy that overwrites both headers;
//! exposed directly, any client can pick its own identity key.

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request};
use std::net::SocketAddr;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_REAL_IP: &str = "x-real-ip";

/// Identity used when neither headers nor the peer address are available.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Resolve the identity key for a request.
///
/// Precedence: first `X-Forwarded-For` entry, then `X-Real-IP`, then the
/// peer IP without its port.
pub fn client_identity(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = header_str(headers, X_FORWARDED_FOR) {
        let first = forwarded.split(',').next().unwrap_or_default().trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }

    if let Some(real_ip) = header_str(headers, X_REAL_IP) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    match peer {
        Some(addr) => addr.ip().to_string(),
        None => UNKNOWN_CLIENT.to_string(),
    }
}

/// Resolve the identity key for `request`, using the peer address recorded
/// by the listener when present.
pub fn request_identity<B>(request: &Request<B>) -> String {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    client_identity(request.headers(), peer)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
