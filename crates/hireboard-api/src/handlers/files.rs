use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use hireboard_core::{DownloadFileQuery, DownloadFileResponse, UploadFileRequest, UploadFileResponse};
use hireboard_infra::ErrorResponse;
use validator::Validate;

use crate::auth::Principal;
use crate::error::{HttpAppError, LenientQuery, ValidatedJson};
use crate::state::AppState;

/// Presigned URL for uploading a resume
///
/// Asking again within the cache window with the same content type and size
/// returns the same URL.
#[utoipa::path(
    post,
    path = "/api/files",
    tag = "files",
    request_body = UploadFileRequest,
    responses(
        (status = 200, description = "Upload URL issued", body = UploadFileResponse),
        (status = 400, description = "File too large or type not allowed", body = ErrorResponse),
        (status = 403, description = "Caller may not upload", body = ErrorResponse),
        (status = 500, description = "Signing failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(user_id = %principal.id, operation = "upload_file"))]
pub async fn upload_file(
    principal: Principal,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<UploadFileRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;
    let response = state.files.issue_upload(&principal, &request).await?;
    Ok(Json(response))
}

/// Presigned URL for downloading a resume
///
/// Staff must pass the current TOTP code as `passcode`.
#[utoipa::path(
    get,
    path = "/api/files/{object_key}",
    tag = "files",
    params(
        ("object_key" = String, Path, description = "Key returned by the upload endpoint"),
        DownloadFileQuery
    ),
    responses(
        (status = 200, description = "Download URL issued", body = DownloadFileResponse),
        (status = 400, description = "Passcode missing", body = ErrorResponse),
        (status = 403, description = "Not the owner, or passcode rejected", body = ErrorResponse),
        (status = 500, description = "Signing failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(user_id = %principal.id, operation = "download_file"))]
pub async fn download_file(
    principal: Principal,
    State(state): State<Arc<AppState>>,
    Path(object_key): Path<String>,
    LenientQuery(query): LenientQuery<DownloadFileQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let response = state
        .files
        .issue_download(&principal, &object_key, query.passcode.as_deref())
        .await?;
    Ok(Json(response))
}
