use crate::constants::{ALLOWED_RESUME_CONTENT_TYPES, MAX_RESUME_SIZE_BYTES};
use crate::error::AppError;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UploadValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Empty file")]
    EmptyFile,
}

impl From<UploadValidationError> for AppError {
    fn from(err: UploadValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Resume upload validator
#[derive(Debug, Clone)]
pub struct ResumeValidator {
    max_file_size: u64,
    allowed_content_types: Vec<String>,
}

impl Default for ResumeValidator {
    fn default() -> Self {
        Self::new(
            MAX_RESUME_SIZE_BYTES,
            ALLOWED_RESUME_CONTENT_TYPES
                .iter()
                .map(|ct| ct.to_string())
                .collect(),
        )
    }
}

impl ResumeValidator {
    pub fn new(max_file_size: u64, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types,
        }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn validate_file_size(&self, size: u64) -> Result<(), UploadValidationError> {
        if size == 0 {
            return Err(UploadValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(UploadValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Case-insensitive match against the allow-list
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), UploadValidationError> {
        let normalized = content_type.trim().to_lowercase();

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(UploadValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Rejects the upload when the size is out of range or the type is not allowed
    pub fn validate(&self, content_type: &str, size: u64) -> Result<(), UploadValidationError> {
        self.validate_file_size(size)?;
        self.validate_content_type(content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_boundaries() {
        let validator = ResumeValidator::default();
        assert_eq!(
            validator.validate_file_size(0),
            Err(UploadValidationError::EmptyFile)
        );
        assert!(validator.validate_file_size(1).is_ok());
        assert!(validator.validate_file_size(5 * 1024 * 1024).is_ok());
        assert!(matches!(
            validator.validate_file_size(5 * 1024 * 1024 + 1),
            Err(UploadValidationError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_allowed_types() {
        let validator = ResumeValidator::default();
        for ct in ALLOWED_RESUME_CONTENT_TYPES {
            assert!(validator.validate_content_type(ct).is_ok(), "{ct}");
        }
        assert!(validator.validate_content_type("Application/PDF").is_ok());
        assert!(validator.validate_content_type("text/plain").is_err());
        assert!(validator.validate_content_type("").is_err());
    }

    #[test]
    fn test_allowed_type_with_oversized_file_is_rejected() {
        let validator = ResumeValidator::default();
        assert!(validator
            .validate("application/pdf", 5 * 1024 * 1024 + 1)
            .is_err());
        assert!(validator.validate("text/plain", 1024).is_err());
        assert!(validator.validate("application/pdf", 1024).is_ok());
    }

    #[test]
    fn test_errors_map_to_bad_request() {
        let err: AppError = UploadValidationError::EmptyFile.into();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
