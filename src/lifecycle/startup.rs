//! Startup orchestration.
//!
//! Subsystems start in dependency order: metrics exporter, listener, then
//! the HTTP server (which starts the rate limiter sweep). Traffic is only
//! accepted once everything before it is ready.

use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;

use crate::config::{ConfigError, ServiceConfig};
use crate::http::server::{HttpServer, ServerError};
use crate::lifecycle::signals::wait_for_signal;
use crate::observability::metrics;

/// Report a configuration that could not be loaded. Logging is installed
/// with default settings by then, so the failure reaches the usual sink.
pub fn log_config_error(error: &ConfigError, path: Option<&Path>) {
    tracing::error!(error = %error, config_file = ?path, "Failed to load configuration");
}

/// Run the service until SIGINT/SIGTERM and a graceful drain.
pub async fn run(config: ServiceConfig) -> Result<(), ServerError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = match TcpListener::bind(&config.listener.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(
                error = %e,
                bind_address = %config.listener.bind_address,
                "Server failed to start"
            );
            return Err(ServerError::Bind(e));
        }
    };
    let local_addr = listener.local_addr()?;

    tracing::info!(
        port = local_addr.port(),
        rate_limit = config.rate_limit.requests,
        rate_limit_window = ?config.rate_limit.window(),
        "Server starting"
    );

    HttpServer::new(config).run(listener, wait_for_signal()).await
}
