//! Resilience subsystem.
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every request has a deadline
//! - A missed deadline still produces the standard response envelope

pub mod timeouts;

pub use timeouts::deadline_middleware;
