//! Contact form intake.
//!
//! # Data Flow
//! ```text
//! POST /contact (after request-ID and rate-limit stages)
//!     → handlers.rs (size check, body read, JSON decode)
//!     → validation.rs (trim, presence, length, email format)
//!     → structured log entry + success envelope
//! ```
//!
//! Submissions are not persisted or forwarded anywhere.

pub mod handlers;
pub mod validation;

pub use validation::{validate, Submission, ValidationError};
