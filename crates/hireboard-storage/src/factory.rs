//! Backend selection from configuration

use std::sync::Arc;

use hireboard_core::Config;

use crate::cache::{CacheResult, InMemoryPresignCache, PresignCache};
use crate::traits::{Presigner, StorageResult};

/// Create the presigner for the configured object store
#[allow(unused_variables)]
pub async fn create_presigner(config: &Config) -> StorageResult<Arc<dyn Presigner>> {
    #[cfg(feature = "storage-s3")]
    {
        let presigner =
            crate::s3::S3Presigner::new(config.s3_region(), config.s3_endpoint()).await?;
        Ok(Arc::new(presigner))
    }

    #[cfg(not(feature = "storage-s3"))]
    {
        Err(crate::traits::StorageError::ConfigError(
            "S3 support not enabled. Enable 'storage-s3' feature.".to_string(),
        ))
    }
}

/// Create the presign cache: Redis when `REDIS_URL` is set, otherwise
/// process-local.
pub async fn create_presign_cache(config: &Config) -> CacheResult<Arc<dyn PresignCache>> {
    match config.redis_url() {
        #[cfg(feature = "cache-redis")]
        Some(url) => Ok(Arc::new(crate::cache::RedisPresignCache::new(url).await?)),
        #[cfg(not(feature = "cache-redis"))]
        Some(_) => Err(crate::cache::CacheError::Backend(
            "Redis support not enabled. Enable 'cache-redis' feature.".to_string(),
        )),
        None => {
            if config.is_production() {
                tracing::warn!(
                    "REDIS_URL not set; presign cache is per-process and upload URLs will not be shared across instances"
                );
            }
            Ok(Arc::new(InMemoryPresignCache::new()))
        }
    }
}
