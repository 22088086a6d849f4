//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → client_ip.rs (resolve identity key from proxy headers / peer)
//!     → rate_limit.rs (sliding-window admission per identity)
//!     → Pass to handler
//! ```
//!
//! # Design Decisions
//! - Fail closed: rejected requests never reach the handler
//! - Forwarded headers are trusted only behind a proxy that sets them

pub mod client_ip;
pub mod rate_limit;

pub use client_ip::client_identity;
pub use rate_limit::{rate_limit_middleware, RateLimiter};
