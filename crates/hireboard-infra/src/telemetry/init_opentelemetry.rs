use hireboard_core::config::LogFormat;
use hireboard_core::{Config, OtelConfig, OtlpProtocol};
use opentelemetry::{trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    runtime,
    trace::{self as sdktrace, BatchSpanProcessor, RandomIdGenerator, Sampler},
    Resource,
};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber, exporting spans over OTLP when an
/// endpoint is configured.
pub fn init_telemetry(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let otel = config.otel();

    let otel_layer = match &otel.endpoint {
        Some(endpoint) => {
            let provider = build_tracer_provider(otel, endpoint, config.environment())?;
            let tracer = provider.tracer(otel.service_name.clone());
            opentelemetry::global::set_tracer_provider(provider);
            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        None => None,
    };

    let registry = tracing_subscriber::registry()
        .with(super::env_filter())
        .with(otel_layer);

    match config.log_format() {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()?,
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init()?,
    }

    match &otel.endpoint {
        Some(endpoint) => tracing::info!(
            endpoint = %endpoint,
            protocol = ?otel.protocol,
            service_name = %otel.service_name,
            sample_ratio = otel.sample_ratio,
            "OpenTelemetry initialized"
        ),
        None => tracing::info!("No trace endpoint configured, spans are not exported"),
    }
    Ok(())
}

fn build_tracer_provider(
    otel: &OtelConfig,
    endpoint: &str,
    environment: &str,
) -> Result<sdktrace::TracerProvider, Box<dyn std::error::Error>> {
    let exporter = match otel.protocol {
        OtlpProtocol::Http => opentelemetry_otlp::SpanExporter::builder()
            .with_http()
            .with_endpoint(endpoint)
            .build()
            .map_err(|e| format!("Failed to build HTTP span exporter: {}", e))?,
        OtlpProtocol::Grpc => opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()
            .map_err(|e| format!("Failed to build gRPC span exporter: {}", e))?,
    };

    let resource = Resource::new(vec![
        KeyValue::new(SERVICE_NAME, otel.service_name.clone()),
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
        KeyValue::new("deployment.environment", environment.to_string()),
    ]);

    Ok(sdktrace::TracerProvider::builder()
        .with_span_processor(BatchSpanProcessor::builder(exporter, runtime::Tokio).build())
        .with_sampler(sampler_for(otel.sample_ratio))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource)
        .build())
}

fn sampler_for(ratio: f64) -> Sampler {
    if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else {
        Sampler::TraceIdRatioBased(ratio)
    }
}

pub async fn shutdown_telemetry() {
    tracing::info!("Flushing spans");
    opentelemetry::global::shutdown_tracer_provider();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampler_follows_ratio() {
        assert!(matches!(sampler_for(0.0), Sampler::AlwaysOff));
        assert!(matches!(sampler_for(1.0), Sampler::AlwaysOn));
        assert!(matches!(
            sampler_for(0.25),
            Sampler::TraceIdRatioBased(ratio) if ratio == 0.25
        ));
    }
}
