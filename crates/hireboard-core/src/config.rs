//! Configuration module
//!
//! Server, database, object storage, presign cache, pagination and trace
//! export settings, read from the environment (and an optional `.env` file).

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_PAGE_SIZE, DEFAULT_PRESIGN_CACHE_TTL_SECS, DEFAULT_PRESIGN_EXPIRY_SECS,
    MAX_PAGE_SIZE, MAX_RESUME_SIZE_BYTES,
};
use crate::filter::PageLimits;

const SERVER_PORT: u16 = 8080;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_SERVICE_NAME: &str = "hireboard-api";

/// Settings that do not depend on the job board domain
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
    pub log_format: LogFormat,
}

/// Console log rendering
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// Transport used to reach the OTLP collector
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OtlpProtocol {
    Grpc,
    Http,
}

impl std::str::FromStr for OtlpProtocol {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grpc" => Ok(OtlpProtocol::Grpc),
            "http" | "http/protobuf" => Ok(OtlpProtocol::Http),
            other => Err(anyhow::anyhow!(
                "OTEL_EXPORTER_OTLP_PROTOCOL must be grpc or http/protobuf, got {}",
                other
            )),
        }
    }
}

/// OpenTelemetry trace export. Spans are only exported when an endpoint is set.
#[derive(Clone, Debug, PartialEq)]
pub struct OtelConfig {
    pub endpoint: Option<String>,
    pub protocol: OtlpProtocol,
    pub service_name: String,
    /// Fraction of root spans kept, 0.0 to 1.0
    pub sample_ratio: f64,
}

impl Default for OtelConfig {
    fn default() -> Self {
        OtelConfig {
            endpoint: None,
            protocol: OtlpProtocol::Grpc,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            sample_ratio: 1.0,
        }
    }
}

impl OtelConfig {
    /// Reads the standard `OTEL_*` variables. `TRACER_ENDPOINT` is accepted
    /// when `OTEL_EXPORTER_OTLP_ENDPOINT` is unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let endpoint = var("OTEL_EXPORTER_OTLP_ENDPOINT").or_else(|| var("TRACER_ENDPOINT"));
        let protocol = match var("OTEL_EXPORTER_OTLP_PROTOCOL") {
            Some(raw) => raw.parse()?,
            None => OtlpProtocol::Grpc,
        };
        let sample_ratio = match var("OTEL_SAMPLE_RATIO") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("OTEL_SAMPLE_RATIO must be a number"))?,
            None => 1.0,
        };

        Ok(OtelConfig {
            endpoint,
            protocol,
            service_name: var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
            sample_ratio,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub database_url: String,
    // Object storage
    pub s3_bucket: String,
    pub s3_region: String,
    // Custom endpoint for S3-compatible providers (MinIO, LocalStack, ...)
    pub s3_endpoint: Option<String>,
    // Presigned URLs
    pub presign_expiry_secs: u64,
    pub presign_cache_ttl_secs: u64,
    pub redis_url: Option<String>,
    pub max_resume_size_bytes: u64,
    // Listing
    pub default_page_size: i64,
    pub max_page_size: i64,
    pub otel: OtelConfig,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let log_format = match env::var("LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        };

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            environment,
            log_format,
        };

        let config = Config {
            base,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            s3_bucket: env::var("S3_BUCKET")
                .map_err(|_| anyhow::anyhow!("S3_BUCKET must be set"))?,
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .unwrap_or_else(|_| DEFAULT_REGION.to_string()),
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.trim().is_empty()),
            presign_expiry_secs: env::var("PRESIGN_EXPIRY_SECS")
                .unwrap_or_else(|_| DEFAULT_PRESIGN_EXPIRY_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_PRESIGN_EXPIRY_SECS),
            presign_cache_ttl_secs: env::var("PRESIGN_CACHE_TTL_SECS")
                .unwrap_or_else(|_| DEFAULT_PRESIGN_CACHE_TTL_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_PRESIGN_CACHE_TTL_SECS),
            redis_url: env::var("REDIS_URL").ok().filter(|s| !s.trim().is_empty()),
            max_resume_size_bytes: env::var("MAX_RESUME_SIZE_BYTES")
                .unwrap_or_else(|_| MAX_RESUME_SIZE_BYTES.to_string())
                .parse()
                .unwrap_or(MAX_RESUME_SIZE_BYTES),
            default_page_size: env::var("DEFAULT_PAGE_SIZE")
                .unwrap_or_else(|_| DEFAULT_PAGE_SIZE.to_string())
                .parse()
                .unwrap_or(DEFAULT_PAGE_SIZE),
            max_page_size: env::var("MAX_PAGE_SIZE")
                .unwrap_or_else(|_| MAX_PAGE_SIZE.to_string())
                .parse()
                .unwrap_or(MAX_PAGE_SIZE),
            otel: OtelConfig::from_lookup(|key| env::var(key).ok())?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.s3_bucket.trim().is_empty() {
            return Err(anyhow::anyhow!("S3_BUCKET must not be empty"));
        }

        if self.presign_expiry_secs == 0 {
            return Err(anyhow::anyhow!("PRESIGN_EXPIRY_SECS must be positive"));
        }

        // A cached URL must never outlive its signature.
        if self.presign_cache_ttl_secs == 0
            || self.presign_cache_ttl_secs >= self.presign_expiry_secs
        {
            return Err(anyhow::anyhow!(
                "PRESIGN_CACHE_TTL_SECS must be positive and smaller than PRESIGN_EXPIRY_SECS"
            ));
        }

        if self.max_resume_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_RESUME_SIZE_BYTES must be positive"));
        }

        if self.default_page_size <= 0 || self.max_page_size < self.default_page_size {
            return Err(anyhow::anyhow!(
                "DEFAULT_PAGE_SIZE must be positive and not exceed MAX_PAGE_SIZE"
            ));
        }

        if !(0.0..=1.0).contains(&self.otel.sample_ratio) {
            return Err(anyhow::anyhow!("OTEL_SAMPLE_RATIO must be between 0.0 and 1.0"));
        }

        Ok(())
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn log_format(&self) -> LogFormat {
        self.base.log_format
    }

    pub fn otel(&self) -> &OtelConfig {
        &self.otel
    }

    pub fn db_max_connections(&self) -> u32 {
        self.base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.base.db_timeout_seconds
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn s3_bucket(&self) -> &str {
        &self.s3_bucket
    }

    pub fn s3_region(&self) -> &str {
        &self.s3_region
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url.as_deref()
    }

    pub fn presign_expiry(&self) -> Duration {
        Duration::from_secs(self.presign_expiry_secs)
    }

    pub fn presign_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.presign_cache_ttl_secs)
    }

    pub fn max_resume_size_bytes(&self) -> u64 {
        self.max_resume_size_bytes
    }

    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> Config {
        Config {
            base: BaseConfig {
                server_port: 8080,
                cors_origins: vec!["*".to_string()],
                db_max_connections: 5,
                db_timeout_seconds: 30,
                environment: "development".to_string(),
                log_format: LogFormat::Compact,
            },
            database_url: "postgresql://localhost/hireboard".to_string(),
            s3_bucket: "resumes".to_string(),
            s3_region: "us-east-1".to_string(),
            s3_endpoint: None,
            presign_expiry_secs: DEFAULT_PRESIGN_EXPIRY_SECS,
            presign_cache_ttl_secs: DEFAULT_PRESIGN_CACHE_TTL_SECS,
            redis_url: None,
            max_resume_size_bytes: MAX_RESUME_SIZE_BYTES,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            otel: OtelConfig::default(),
        }
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(create_test_config().validate().is_ok());
    }

    #[test]
    fn test_cache_ttl_must_be_shorter_than_expiry() {
        let mut config = create_test_config();
        config.presign_cache_ttl_secs = config.presign_expiry_secs;
        assert!(config.validate().is_err());

        config.presign_cache_ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let mut config = create_test_config();
        config.base.environment = "production".to_string();
        assert!(config.is_production());
        assert!(config.validate().is_err());

        config.base.cors_origins = vec!["https://jobs.example.com".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_url_must_be_postgres() {
        let mut config = create_test_config();
        config.database_url = "mysql://localhost/hireboard".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_page_limits_follow_config() {
        let mut config = create_test_config();
        config.default_page_size = 5;
        config.max_page_size = 50;
        let limits = config.page_limits();
        assert_eq!(limits.default_page_size, 5);
        assert_eq!(limits.max_page_size, 50);

        config.max_page_size = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_trace_export_is_off_without_endpoint() {
        let otel = OtelConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(otel, OtelConfig::default());
        assert!(!otel.is_enabled());
    }

    #[test]
    fn test_trace_endpoint_variables() {
        let otel = OtelConfig::from_lookup(lookup(&[("TRACER_ENDPOINT", "localhost:4317")])).unwrap();
        assert_eq!(otel.endpoint.as_deref(), Some("localhost:4317"));
        assert_eq!(otel.protocol, OtlpProtocol::Grpc);

        let otel = OtelConfig::from_lookup(lookup(&[
            ("TRACER_ENDPOINT", "localhost:4317"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4318"),
            ("OTEL_EXPORTER_OTLP_PROTOCOL", "http/protobuf"),
            ("OTEL_SERVICE_NAME", "hireboard-staging"),
            ("OTEL_SAMPLE_RATIO", "0.25"),
        ]))
        .unwrap();
        assert_eq!(otel.endpoint.as_deref(), Some("http://collector:4318"));
        assert_eq!(otel.protocol, OtlpProtocol::Http);
        assert_eq!(otel.service_name, "hireboard-staging");
        assert_eq!(otel.sample_ratio, 0.25);
    }

    #[test]
    fn test_bad_trace_settings_are_rejected() {
        assert!(OtelConfig::from_lookup(lookup(&[("OTEL_EXPORTER_OTLP_PROTOCOL", "udp")])).is_err());
        assert!(OtelConfig::from_lookup(lookup(&[("OTEL_SAMPLE_RATIO", "most")])).is_err());

        let mut config = create_test_config();
        config.otel.sample_ratio = 1.5;
        assert!(config.validate().is_err());
    }
}
