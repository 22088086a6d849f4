//! OS signal handling.

/// Wait for SIGINT or SIGTERM and log which one arrived.
pub async fn wait_for_signal() {
    let signal = received_signal().await;
    tracing::info!(signal, "Shutdown signal received");
}

#[cfg(unix)]
async fn received_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install SIGTERM handler, listening for SIGINT only");
            return interrupt().await;
        }
    };

    tokio::select! {
        _ = terminate.recv() => "SIGTERM",
        name = interrupt() => name,
    }
}

#[cfg(not(unix))]
async fn received_signal() -> &'static str {
    interrupt().await
}

async fn interrupt() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a handler the process can only be stopped externally.
        tracing::error!(error = %e, "Failed to install SIGINT handler");
        std::future::pending::<()>().await;
    }
    "SIGINT"
}
