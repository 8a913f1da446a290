use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use hireboard_storage::{CacheError, CacheResult, CachedUpload, PresignCache};
use hireboard_storage::{Presigner, StorageError, StorageResult};

/// Presigner that mints distinguishable URLs without signing anything.
#[derive(Default)]
pub struct FakePresigner {
    issued: AtomicUsize,
    failing: AtomicBool,
}

impl FakePresigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn next(&self) -> StorageResult<usize> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::SigningFailed("signer unavailable".to_string()));
        }
        Ok(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl Presigner for FakePresigner {
    async fn presign_upload(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        content_length: u64,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let n = self.next()?;
        Ok(format!(
            "https://s3.test/{}/{}?method=PUT&content-type={}&content-length={}&expires={}&sig={}",
            bucket,
            key,
            content_type,
            content_length,
            expires_in.as_secs(),
            n
        ))
    }

    async fn presign_download(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let n = self.next()?;
        Ok(format!(
            "https://s3.test/{}/{}?method=GET&expires={}&sig={}",
            bucket,
            key,
            expires_in.as_secs(),
            n
        ))
    }
}

/// Cache whose backend is always down
pub struct BrokenCache;

#[async_trait]
impl PresignCache for BrokenCache {
    async fn get(&self, _bucket: &str, _principal: &str) -> CacheResult<Option<CachedUpload>> {
        Err(CacheError::Backend("connection refused".to_string()))
    }

    async fn put(
        &self,
        _bucket: &str,
        _principal: &str,
        _entry: &CachedUpload,
        _ttl: Duration,
    ) -> CacheResult<CachedUpload> {
        Err(CacheError::Backend("connection refused".to_string()))
    }

    async fn replace(
        &self,
        _bucket: &str,
        _principal: &str,
        _entry: &CachedUpload,
        _ttl: Duration,
    ) -> CacheResult<()> {
        Err(CacheError::Backend("connection refused".to_string()))
    }
}
