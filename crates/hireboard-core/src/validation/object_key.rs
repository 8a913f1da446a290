use crate::error::AppError;

pub const MAX_OBJECT_KEY_LENGTH: usize = 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ObjectKeyError {
    #[error("object key is empty")]
    Empty,

    #[error("object key exceeds {max} bytes")]
    TooLong { max: usize },

    #[error("object key {0} is not allowed")]
    Traversal(String),

    #[error("object key contains control characters")]
    ControlCharacters,
}

impl From<ObjectKeyError> for AppError {
    fn from(err: ObjectKeyError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Rejects keys that could escape a namespace or are not valid S3 keys.
///
/// Every `/`-separated segment must be non-empty and not `..`.
pub fn check_object_key(key: &str) -> Result<(), ObjectKeyError> {
    if key.is_empty() {
        return Err(ObjectKeyError::Empty);
    }
    if key.len() > MAX_OBJECT_KEY_LENGTH {
        return Err(ObjectKeyError::TooLong {
            max: MAX_OBJECT_KEY_LENGTH,
        });
    }
    if key
        .split('/')
        .any(|segment| segment.is_empty() || segment == "..")
    {
        return Err(ObjectKeyError::Traversal(key.to_string()));
    }
    if key.chars().any(char::is_control) {
        return Err(ObjectKeyError::ControlCharacters);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_must_be_plain() {
        assert!(check_object_key("owner/0191").is_ok());
        assert!(check_object_key("owner/..cv.pdf").is_ok());
        assert_eq!(
            check_object_key("owner/../other/cv"),
            Err(ObjectKeyError::Traversal("owner/../other/cv".to_string()))
        );
        assert!(check_object_key("/owner/cv").is_err());
        assert!(check_object_key("owner//cv").is_err());
        assert!(check_object_key("owner/").is_err());
    }

    #[test]
    fn test_length_and_characters() {
        assert_eq!(check_object_key(""), Err(ObjectKeyError::Empty));
        assert_eq!(
            check_object_key(&"a".repeat(MAX_OBJECT_KEY_LENGTH + 1)),
            Err(ObjectKeyError::TooLong {
                max: MAX_OBJECT_KEY_LENGTH
            })
        );
        assert_eq!(
            check_object_key("owner/c\u{7}v"),
            Err(ObjectKeyError::ControlCharacters)
        );
    }
}
