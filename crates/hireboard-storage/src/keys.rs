//! Object key generation and validation.
//!
//! Key format: `{owner_id}/{object_id}`, where `object_id` is a UUIDv7.

use hireboard_core::validation::check_object_key;
use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

/// Fresh key in the owner's namespace
pub fn generate_object_key(owner_id: Uuid) -> String {
    format!("{}/{}", owner_id, Uuid::now_v7())
}

/// Rejects keys that could escape a namespace or are not valid S3 keys.
pub fn validate_object_key(key: &str) -> StorageResult<()> {
    check_object_key(key).map_err(|e| StorageError::InvalidKey(e.to_string()))
}
