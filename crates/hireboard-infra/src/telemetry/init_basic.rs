use hireboard_core::config::LogFormat;
use hireboard_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber with the configured log format.
pub fn init_telemetry(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let registry = tracing_subscriber::registry().with(super::env_filter());

    match config.log_format() {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()?,
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init()?,
    }

    if let Some(endpoint) = &config.otel().endpoint {
        tracing::warn!(
            endpoint = %endpoint,
            "Trace endpoint configured but OpenTelemetry support is not compiled in"
        );
    }

    tracing::debug!(format = ?config.log_format(), "Tracing initialized");
    Ok(())
}

pub async fn shutdown_telemetry() {
    tracing::debug!("Telemetry shutdown");
}
