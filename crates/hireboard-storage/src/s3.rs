use std::time::{Duration, Instant};

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;

use crate::traits::{Presigner, StorageError, StorageResult};

/// S3 presigner
///
/// Signing is local: no request reaches S3 until the client uses the URL.
#[derive(Clone)]
pub struct S3Presigner {
    client: Client,
}

impl S3Presigner {
    /// Build a presigner from the default AWS credential chain.
    ///
    /// `endpoint` points at an S3-compatible service (MinIO, LocalStack) and
    /// switches to path-style addressing.
    pub async fn new(region: &str, endpoint: Option<&str>) -> StorageResult<Self> {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::info!(region = %region, endpoint = ?endpoint, "S3 presigner initialized");
        Ok(Self {
            client: Client::from_conf(builder.build()),
        })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn presigning_config(expires_in: Duration) -> StorageResult<PresigningConfig> {
        PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::ConfigError(format!("Invalid presign expiry: {}", e)))
    }
}

#[async_trait]
impl Presigner for S3Presigner {
    #[tracing::instrument(skip(self), fields(storage.backend = "s3", storage.operation = "presign_put"))]
    async fn presign_upload(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        content_length: u64,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let start = Instant::now();
        let content_length = i64::try_from(content_length).map_err(|_| {
            StorageError::SigningFailed(format!("content length {} out of range", content_length))
        })?;

        let request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .content_length(content_length)
            .presigned(Self::presigning_config(expires_in)?)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    "S3 upload presign failed"
                );
                StorageError::SigningFailed(e.to_string())
            })?;

        tracing::debug!(
            bucket = %bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload URL signed"
        );

        Ok(request.uri().to_string())
    }

    #[tracing::instrument(skip(self), fields(storage.backend = "s3", storage.operation = "presign_get"))]
    async fn presign_download(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let start = Instant::now();

        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(Self::presigning_config(expires_in)?)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    "S3 download presign failed"
                );
                StorageError::SigningFailed(e.to_string())
            })?;

        tracing::debug!(
            bucket = %bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download URL signed"
        );

        Ok(request.uri().to_string())
    }
}
