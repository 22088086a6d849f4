//! HTTP server setup and connection handling.
//!
//! # Responsibilities
//! - Build the Axum router with all routes and middleware
//! - Accept connections and serve them over HTTP/1.1 with timeouts
//! - Run the rate limiter sweep for the server's lifetime
//! - Drain in-flight connections on shutdown, bounded by a deadline
//!
//! # Middleware order (outermost first)
//! ```text
//! request ID → metrics → trace span → body read timeout → handler deadline
//!     → /contact: rate limit → contact handler
//!     → /health:  health handler
//! ```

use axum::{
    extract::ConnectInfo,
    http::Request,
    middleware,
    routing::{get, post},
    Router,
};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_http::{timeout::RequestBodyTimeoutLayer, trace::TraceLayer};

use crate::config::ServiceConfig;
use crate::contact;
use crate::health;
use crate::http::request::request_id_middleware;
use crate::http::response::{method_not_allowed, not_found};
use crate::lifecycle::Shutdown;
use crate::observability::{metrics, tracing::make_request_span};
use crate::resilience::deadline_middleware;
use crate::security::{rate_limit_middleware, RateLimiter};

/// Pause after a failed accept before trying again.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Fatal server errors. Each one ends the process with a non-zero status.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind listener: {0}")]
    Bind(std::io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("connections did not drain within {0:?}")]
    ShutdownTimeout(Duration),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub limiter: Arc<RateLimiter>,
}

/// HTTP server for the contact service.
pub struct HttpServer {
    router: Router,
    config: Arc<ServiceConfig>,
    limiter: Arc<RateLimiter>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig) -> Self {
        let config = Arc::new(config);
        let limiter = Arc::new(RateLimiter::from_config(&config.rate_limit));

        let state = AppState {
            config: config.clone(),
            limiter: limiter.clone(),
        };

        Self {
            router: build_router(state),
            config,
            limiter,
        }
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Serve connections from `listener` until `shutdown` resolves, then
    /// drain in-flight connections within the configured deadline.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server listening");

        let coordinator = Shutdown::new();
        let sweeper = self.limiter.spawn_sweeper(
            self.config.rate_limit.sweep_interval(),
            coordinator.subscribe(),
        );

        let mut http = http1::Builder::new();
        http.timer(TokioTimer::new())
            .header_read_timeout(self.config.timeouts.idle())
            .keep_alive(true);

        let graceful = GracefulShutdown::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to accept connection");
                            tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                            continue;
                        }
                    };

                    let router = self.router.clone();
                    let service = service_fn(move |mut request: Request<Incoming>| {
                        request.extensions_mut().insert(ConnectInfo(peer));
                        router.clone().oneshot(request)
                    });

                    let connection = graceful.watch(http.serve_connection(TokioIo::new(stream), service));
                    tokio::spawn(async move {
                        if let Err(e) = connection.await {
                            tracing::debug!(peer = %peer, error = %e, "Connection closed with error");
                        }
                    });
                }
                _ = &mut shutdown => break,
            }
        }

        // Refuse new connections while the existing ones drain.
        drop(listener);
        coordinator.trigger();
        if let Err(e) = sweeper.await {
            tracing::warn!(error = %e, "Rate limiter sweeper ended abnormally");
        }

        let deadline = self.config.timeouts.shutdown();
        match tokio::time::timeout(deadline, graceful.shutdown()).await {
            Ok(()) => {
                tracing::info!("Server gracefully stopped");
                Ok(())
            }
            Err(_) => {
                tracing::error!(timeout = ?deadline, "Server forced to shutdown");
                Err(ServerError::ShutdownTimeout(deadline))
            }
        }
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    let timeouts = state.config.timeouts.clone();

    let contact_route = post(contact::handlers::submit)
        .fallback(method_not_allowed)
        .layer(middleware::from_fn_with_state(
            state.limiter.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .route("/contact", contact_route)
        .route("/health", get(health::check).fallback(method_not_allowed))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn_with_state(timeouts.write(), deadline_middleware))
        .layer(RequestBodyTimeoutLayer::new(timeouts.read()))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(middleware::from_fn(metrics::track_requests))
        .layer(middleware::from_fn(request_id_middleware))
}
