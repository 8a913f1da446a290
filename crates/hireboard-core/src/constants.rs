//! Shared constants

/// Header carrying the caller's user id.
pub const PRINCIPAL_HEADER: &str = "X-Hireboard-User";

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Validity window of presigned upload and download URLs.
pub const DEFAULT_PRESIGN_EXPIRY_SECS: u64 = 300;
/// How long an issued upload URL is handed out again to the same principal.
pub const DEFAULT_PRESIGN_CACHE_TTL_SECS: u64 = 30;

/// 5 MiB
pub const MAX_RESUME_SIZE_BYTES: u64 = 5 * 1024 * 1024;

pub const ALLOWED_RESUME_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/png",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];
