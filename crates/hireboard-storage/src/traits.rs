//! Presigning abstraction
//!
//! Object bytes never pass through the service; clients move them with URLs
//! minted by a [`Presigner`].

use std::time::Duration;

use async_trait::async_trait;
use hireboard_core::AppError;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(msg) => AppError::BadRequest(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Mints time-limited URLs for direct object access.
#[async_trait]
pub trait Presigner: Send + Sync {
    /// Presigned PUT URL.
    ///
    /// The signature covers the content type and length, so the upload must
    /// send exactly those headers.
    async fn presign_upload(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        content_length: u64,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Presigned GET URL
    async fn presign_download(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;
}
