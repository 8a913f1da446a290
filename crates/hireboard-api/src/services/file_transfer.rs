//! Presigned resume transfers
//!
//! Uploads: validate the declared file, reuse a cached URL for the same
//! principal when the declaration matches, otherwise sign a fresh one under
//! the principal's key prefix. Downloads: owner or second factor, then sign.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use hireboard_core::constants::ALLOWED_RESUME_CONTENT_TYPES;
use hireboard_core::policy::{self, DownloadGate, Operation};
use hireboard_core::validation::ResumeValidator;
use hireboard_core::{
    AppError, Config, DownloadFileResponse, UploadFileRequest, UploadFileResponse,
};
use hireboard_db::UserStore;
use hireboard_storage::keys::{generate_object_key, validate_object_key};
use hireboard_storage::{CachedUpload, PresignCache, Presigner};

use crate::auth::Principal;
use crate::services::second_factor::SecondFactorVerifier;

/// Bucket, URL lifetimes and upload limits
#[derive(Debug, Clone)]
pub struct TransferSettings {
    pub bucket: String,
    pub expiry: Duration,
    pub cache_ttl: Duration,
    pub validator: ResumeValidator,
}

impl TransferSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            bucket: config.s3_bucket().to_string(),
            expiry: config.presign_expiry(),
            cache_ttl: config.presign_cache_ttl(),
            validator: ResumeValidator::new(
                config.max_resume_size_bytes(),
                ALLOWED_RESUME_CONTENT_TYPES
                    .iter()
                    .map(|ct| ct.to_string())
                    .collect(),
            ),
        }
    }
}

#[derive(Clone)]
pub struct FileTransferService {
    presigner: Arc<dyn Presigner>,
    cache: Arc<dyn PresignCache>,
    second_factor: SecondFactorVerifier,
    settings: TransferSettings,
}

impl FileTransferService {
    pub fn new(
        presigner: Arc<dyn Presigner>,
        cache: Arc<dyn PresignCache>,
        users: Arc<dyn UserStore>,
        settings: TransferSettings,
    ) -> Self {
        Self {
            presigner,
            cache,
            second_factor: SecondFactorVerifier::new(users),
            settings,
        }
    }

    fn expires_at(&self) -> Result<chrono::DateTime<Utc>, AppError> {
        let expiry = chrono::Duration::from_std(self.settings.expiry)
            .map_err(|e| AppError::Internal(format!("presign expiry out of range: {}", e)))?;
        Ok(Utc::now() + expiry)
    }

    #[tracing::instrument(
        skip(self, principal, request),
        fields(user_id = %principal.id, file_size = request.file_size, operation = "issue_upload")
    )]
    pub async fn issue_upload(
        &self,
        principal: &Principal,
        request: &UploadFileRequest,
    ) -> Result<UploadFileResponse, AppError> {
        policy::authorize(principal.role, Operation::UploadFile)?;

        let content_type = request.content_type.trim();
        self.settings
            .validator
            .validate(content_type, request.file_size)?;

        let bucket = self.settings.bucket.as_str();
        let owner = principal.id.to_string();

        let resident = match self.cache.get(bucket, &owner).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Presign cache read failed; signing a fresh URL");
                None
            }
        };
        // The signature covers Content-Type and Content-Length, so only an
        // identical declaration can reuse the resident URL.
        if let Some(entry) = &resident {
            if entry.matches(content_type, request.file_size) {
                tracing::debug!(object_key = %entry.object_key, "Reusing cached upload URL");
                return Ok(to_upload_response(entry.clone()));
            }
        }

        let object_key = generate_object_key(principal.id);
        validate_object_key(&object_key)?;
        let expires_at = self.expires_at()?;
        let url = self
            .presigner
            .presign_upload(
                bucket,
                &object_key,
                content_type,
                request.file_size,
                self.settings.expiry,
            )
            .await?;

        let fresh = CachedUpload {
            object_key,
            url,
            content_type: content_type.to_string(),
            file_size: request.file_size,
            expires_at,
        };

        let issued = if resident.is_some() {
            // The resident entry was signed for a different declaration
            if let Err(e) = self
                .cache
                .replace(bucket, &owner, &fresh, self.settings.cache_ttl)
                .await
            {
                tracing::warn!(error = %e, "Presign cache write failed");
            }
            fresh
        } else {
            match self
                .cache
                .put(bucket, &owner, &fresh, self.settings.cache_ttl)
                .await
            {
                Ok(winner) if winner.matches(content_type, request.file_size) => winner,
                Ok(_) => fresh,
                Err(e) => {
                    tracing::warn!(error = %e, "Presign cache write failed");
                    fresh
                }
            }
        };

        tracing::info!(object_key = %issued.object_key, "Issued upload URL");
        Ok(to_upload_response(issued))
    }

    #[tracing::instrument(
        skip(self, principal, passcode),
        fields(user_id = %principal.id, operation = "issue_download")
    )]
    pub async fn issue_download(
        &self,
        principal: &Principal,
        object_key: &str,
        passcode: Option<&str>,
    ) -> Result<DownloadFileResponse, AppError> {
        validate_object_key(object_key)?;

        match policy::authorize_download(principal.role, principal.id, object_key)? {
            DownloadGate::Owner => {}
            DownloadGate::SecondFactor => self.second_factor.verify(principal, passcode).await?,
        }

        let expires_at = self.expires_at()?;
        let url = self
            .presigner
            .presign_download(&self.settings.bucket, object_key, self.settings.expiry)
            .await?;

        tracing::info!("Issued download URL");
        Ok(DownloadFileResponse { url, expires_at })
    }
}

fn to_upload_response(entry: CachedUpload) -> UploadFileResponse {
    UploadFileResponse {
        object_key: entry.object_key,
        url: entry.url,
        expires_at: entry.expires_at,
    }
}
