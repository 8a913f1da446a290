use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request for a presigned resume upload URL
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct UploadFileRequest {
    /// Content type (MIME type) the upload will be sent with
    #[validate(length(
        min = 1,
        max = 255,
        message = "Content type must be between 1 and 255 characters"
    ))]
    pub content_type: String,
    /// Original filename
    #[validate(length(
        min = 1,
        max = 255,
        message = "Filename must be between 1 and 255 characters"
    ))]
    pub file_name: String,
    /// Exact size of the upload in bytes
    pub file_size: u64,
}

/// Presigned upload URL and the key the object will be stored under
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadFileResponse {
    pub object_key: String,
    /// PUT the file here with the declared Content-Type and Content-Length
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DownloadFileQuery {
    /// Current TOTP code, required for staff downloads
    pub passcode: Option<String>,
}

impl FromIterator<(String, String)> for DownloadFileQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = DownloadFileQuery::default();
        for (key, value) in pairs {
            if key == "passcode" {
                crate::filter::keep_first(&mut query.passcode, value);
            }
        }
        query
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DownloadFileResponse {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}
