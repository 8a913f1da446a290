//! Presigned upload cache
//!
//! A principal that asks for an upload URL twice within the TTL gets the
//! first URL back, provided the content type and size still match. Entries
//! are keyed by bucket and principal. Concurrent first requests race on an
//! insert-if-absent; the loser adopts the resident entry.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cache entry is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;

#[cfg(feature = "cache-redis")]
impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Backend(err.to_string())
    }
}

/// An issued upload URL and the parameters it was signed for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedUpload {
    pub object_key: String,
    pub url: String,
    pub content_type: String,
    pub file_size: u64,
    pub expires_at: DateTime<Utc>,
}

impl CachedUpload {
    /// The signature binds content type and length, so a cached URL is only
    /// reusable for an identical request.
    pub fn matches(&self, content_type: &str, file_size: u64) -> bool {
        self.content_type == content_type && self.file_size == file_size
    }
}

pub fn cache_key(bucket: &str, principal: &str) -> String {
    format!("upload_tmp:{}/{}", bucket, principal)
}

#[async_trait]
pub trait PresignCache: Send + Sync {
    /// Live entry for the principal, if any
    async fn get(&self, bucket: &str, principal: &str) -> CacheResult<Option<CachedUpload>>;

    /// Insert unless a live entry exists. Returns whichever entry is resident
    /// afterwards.
    async fn put(
        &self,
        bucket: &str,
        principal: &str,
        entry: &CachedUpload,
        ttl: Duration,
    ) -> CacheResult<CachedUpload>;

    /// Unconditional overwrite, used when the resident entry no longer matches.
    async fn replace(
        &self,
        bucket: &str,
        principal: &str,
        entry: &CachedUpload,
        ttl: Duration,
    ) -> CacheResult<()>;
}

/// Process-local cache. Only correct with a single API instance.
#[derive(Default)]
pub struct InMemoryPresignCache {
    entries: Mutex<HashMap<String, (CachedUpload, Instant)>>,
}

impl InMemoryPresignCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop expired entries
    pub async fn cleanup_expired(&self) {
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .retain(|_, (_, expires)| *expires > now);
    }
}

#[async_trait]
impl PresignCache for InMemoryPresignCache {
    async fn get(&self, bucket: &str, principal: &str) -> CacheResult<Option<CachedUpload>> {
        let entries = self.entries.lock().await;
        let now = Instant::now();
        Ok(entries
            .get(&cache_key(bucket, principal))
            .filter(|(_, expires)| *expires > now)
            .map(|(entry, _)| entry.clone()))
    }

    async fn put(
        &self,
        bucket: &str,
        principal: &str,
        entry: &CachedUpload,
        ttl: Duration,
    ) -> CacheResult<CachedUpload> {
        let mut entries = self.entries.lock().await;
        let key = cache_key(bucket, principal);
        let now = Instant::now();

        if let Some((resident, expires)) = entries.get(&key) {
            if *expires > now {
                return Ok(resident.clone());
            }
        }

        entries.insert(key, (entry.clone(), now + ttl));
        Ok(entry.clone())
    }

    async fn replace(
        &self,
        bucket: &str,
        principal: &str,
        entry: &CachedUpload,
        ttl: Duration,
    ) -> CacheResult<()> {
        self.entries.lock().await.insert(
            cache_key(bucket, principal),
            (entry.clone(), Instant::now() + ttl),
        );
        Ok(())
    }
}

/// Redis-backed cache shared by every API instance.
///
/// Entries are JSON strings stored with `SET ... EX`; first writes use `NX`.
#[cfg(feature = "cache-redis")]
#[derive(Clone)]
pub struct RedisPresignCache {
    manager: redis::aio::ConnectionManager,
}

#[cfg(feature = "cache-redis")]
impl RedisPresignCache {
    pub async fn new(url: &str) -> CacheResult<Self> {
        let client = redis::Client::open(url)?;
        let manager = redis::aio::ConnectionManager::new(client).await?;
        tracing::info!("Connected to Redis presign cache");
        Ok(Self { manager })
    }

    fn ttl_secs(ttl: Duration) -> u64 {
        ttl.as_secs().max(1)
    }
}

#[cfg(feature = "cache-redis")]
#[async_trait]
impl PresignCache for RedisPresignCache {
    async fn get(&self, bucket: &str, principal: &str) -> CacheResult<Option<CachedUpload>> {
        let mut conn = self.manager.clone();
        let raw: Option<String> = redis::cmd("GET")
            .arg(cache_key(bucket, principal))
            .query_async(&mut conn)
            .await?;

        raw.map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(CacheError::from)
    }

    async fn put(
        &self,
        bucket: &str,
        principal: &str,
        entry: &CachedUpload,
        ttl: Duration,
    ) -> CacheResult<CachedUpload> {
        let mut conn = self.manager.clone();
        let key = cache_key(bucket, principal);
        let payload = serde_json::to_string(entry)?;

        let stored: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(&payload)
            .arg("NX")
            .arg("EX")
            .arg(Self::ttl_secs(ttl))
            .query_async(&mut conn)
            .await?;
        if stored.is_some() {
            return Ok(entry.clone());
        }

        let resident: Option<String> = redis::cmd("GET").arg(&key).query_async(&mut conn).await?;
        match resident {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            // Resident entry expired between SET and GET
            None => Ok(entry.clone()),
        }
    }

    async fn replace(
        &self,
        bucket: &str,
        principal: &str,
        entry: &CachedUpload,
        ttl: Duration,
    ) -> CacheResult<()> {
        let mut conn = self.manager.clone();
        let payload = serde_json::to_string(entry)?;
        let _: () = redis::cmd("SET")
            .arg(cache_key(bucket, principal))
            .arg(payload)
            .arg("EX")
            .arg(Self::ttl_secs(ttl))
            .query_async(&mut conn)
            .await?;
        Ok(())
    }
}
