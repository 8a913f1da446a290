//! HTTP error body
//!
//! `IntoResponse` for `AppError` lives in `hireboard-api` because of the
//! orphan rule; this crate only owns the wire shape.

use serde::Serialize;
use utoipa::ToSchema;

/// Standard error response format for HTTP APIs
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable code, e.g. `NOT_FOUND`
    pub code: String,
    /// Whether retrying the same request may succeed
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            recoverable: false,
            suggested_action: None,
            details: None,
        }
    }

    pub fn with_guidance(mut self, recoverable: bool, suggested_action: Option<&str>) -> Self {
        self.recoverable = recoverable;
        self.suggested_action = suggested_action.map(str::to_string);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
