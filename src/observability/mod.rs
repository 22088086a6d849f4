//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, NDJSON on stdout)
//!     → metrics.rs (counters)
//!     → tracing.rs (per-request spans carrying the request ID)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through all log entries of a request
//! - Metrics are cheap (atomic increments) and a no-op without an exporter

pub mod logging;
pub mod metrics;
pub mod tracing;
