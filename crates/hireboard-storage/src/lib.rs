//! Hireboard Storage Library
//!
//! Presigned URL issuance for resume objects and the short-lived cache that
//! hands the same upload URL back to a principal who asks twice.
//!
//! # Object key format
//!
//! Keys are owner-scoped: `{user_id}/{object_id}`. Ownership checks compare
//! against the `{user_id}/` prefix, so keys must not contain `..` or start
//! with `/`. Key generation lives in the `keys` module.

pub mod cache;
pub mod factory;
pub mod keys;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

pub use cache::{CacheError, CacheResult, CachedUpload, InMemoryPresignCache, PresignCache};
#[cfg(feature = "cache-redis")]
pub use cache::RedisPresignCache;
pub use factory::{create_presign_cache, create_presigner};
#[cfg(feature = "storage-s3")]
pub use s3::S3Presigner;
pub use traits::{Presigner, StorageError, StorageResult};
