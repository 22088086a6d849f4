//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (accept loop, HTTP/1.1, timeouts, middleware stack)
//!     → request.rs (request ID tagging)
//!     → [rate limit stage on /contact] (security::rate_limit)
//!     → handler (contact / health)
//!     → response.rs (JSON envelope)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id_middleware, RequestContext, X_REQUEST_ID};
pub use response::{ApiResponse, Status};
pub use server::{build_router, AppState, HttpServer, ServerError};
