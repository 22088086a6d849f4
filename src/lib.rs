//! Contact form backend.
//!
//! Accepts contact-form submissions over HTTP, rate-limits them per client,
//! validates them and records each accepted inquiry as a structured log
//! entry. A health endpoint reports liveness.

pub mod config;
pub mod contact;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod security;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
