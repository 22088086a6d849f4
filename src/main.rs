//! Contact form backend.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ listener ──▶ request ID ──▶ rate limit ──▶ contact handler
//!                                      │                            │
//!                                      │                            ▼
//!                                      └──────────▶ health      validation
//!                                                                   │
//!     Client Response ◀─────────── JSON envelope ◀── structured log ┘
//!
//!     Cross-cutting: config, observability, lifecycle (startup/shutdown)
//! ```

use clap::Parser;
use std::path::PathBuf;

use contact_service::config::{load_or_default, ObservabilityConfig};
use contact_service::lifecycle::startup;
use contact_service::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "contact-service")]
#[command(about = "Contact form backend", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = load_or_default(cli.config.as_deref());
    let observability = match &loaded {
        Ok(config) => config.observability.clone(),
        Err(_) => ObservabilityConfig::default(),
    };
    init_logging(&observability)?;

    let config =
        loaded.inspect_err(|e| startup::log_config_error(e, cli.config.as_deref()))?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        config_file = ?cli.config,
        "Configuration loaded"
    );

    startup::run(config).await?;
    Ok(())
}
