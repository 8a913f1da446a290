//! Tracing subscriber initialization
//!
//! Span export over OTLP is compiled in with `observability-opentelemetry`;
//! without it only the fmt layer is installed.

#[cfg(feature = "observability-opentelemetry")]
mod init_opentelemetry;

#[cfg(not(feature = "observability-opentelemetry"))]
mod init_basic;

#[cfg(feature = "observability-opentelemetry")]
pub use init_opentelemetry::{init_telemetry, shutdown_telemetry};

#[cfg(not(feature = "observability-opentelemetry"))]
pub use init_basic::{init_telemetry, shutdown_telemetry};

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "hireboard=debug,tower_http=debug";

/// `RUST_LOG` overrides the default filter.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}
