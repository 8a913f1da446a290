//! Presigner and presign cache setup

use std::sync::Arc;

use anyhow::{Context, Result};
use hireboard_core::Config;
use hireboard_storage::{create_presign_cache, create_presigner, PresignCache, Presigner};

pub async fn setup_storage(
    config: &Config,
) -> Result<(Arc<dyn Presigner>, Arc<dyn PresignCache>)> {
    tracing::info!(
        bucket = %config.s3_bucket(),
        region = %config.s3_region(),
        "Initializing presigner..."
    );
    let presigner = create_presigner(config)
        .await
        .context("Failed to initialize presigner")?;

    let cache = create_presign_cache(config)
        .await
        .context("Failed to initialize presign cache")?;
    tracing::info!(
        backend = if config.redis_url().is_some() { "redis" } else { "memory" },
        ttl_secs = config.presign_cache_ttl().as_secs(),
        "Presign cache initialized"
    );

    Ok((presigner, cache))
}
