//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Metrics → Bind listener → Serve
//!
//! Shutdown (shutdown.rs + http::server):
//!     Signal received → Stop accepting → Stop sweeper → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Shutdown has a deadline: non-zero exit if connections do not drain in time

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
