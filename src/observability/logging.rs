//! Structured logging.
//!
//! JSON output writes one record per line to stdout with `timestamp`
//! (RFC3339, UTC), `level`, `message` and the event's fields at the top
//! level. `RUST_LOG` overrides the configured level.

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    util::TryInitError,
    EnvFilter, Layer,
};

use crate::config::{LogFormat, ObservabilityConfig};

/// Directives used when `RUST_LOG` is unset.
pub fn default_directives(level: &str) -> String {
    format!("contact_service={level},tower_http={level}")
}

/// NDJSON formatter with event fields flattened to the top level.
pub fn json_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_target(false)
        .with_writer(writer)
}

/// Install the global subscriber.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));

    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry.with(json_layer(std::io::stdout)).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_cover_service_and_http_layers() {
        assert_eq!(
            default_directives("warn"),
            "contact_service=warn,tower_http=warn"
        );
    }
}
