//! Upload validation
//!
//! Checks a declared upload against the size ceiling and content type
//! allow-list before any URL is signed for it, and object keys against
//! namespace escapes.

mod object_key;
mod resume;

pub use object_key::{check_object_key, ObjectKeyError, MAX_OBJECT_KEY_LENGTH};
pub use resume::{ResumeValidator, UploadValidationError};
