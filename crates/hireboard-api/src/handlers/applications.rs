use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use hireboard_core::filter::ListApplicationsQuery;
use hireboard_core::policy;
use hireboard_core::{
    AppError, Application, ApplicationListing, CreateApplicationRequest, NewApplication, Page,
};
use hireboard_infra::ErrorResponse;
use validator::Validate;

use crate::auth::Principal;
use crate::error::{HttpAppError, LenientQuery, ValidatedJson};
use crate::handlers::jobs::parse_job_id;
use crate::state::AppState;

/// List applications. Candidates only ever see their own.
#[utoipa::path(
    get,
    path = "/api/applications",
    tag = "applications",
    params(ListApplicationsQuery),
    responses(
        (status = 200, description = "One page of applications", body = Page<ApplicationListing>),
        (status = 401, description = "Unknown caller", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(user_id = %principal.id, operation = "list_applications"))]
pub async fn list_applications(
    principal: Principal,
    State(state): State<Arc<AppState>>,
    LenientQuery(query): LenientQuery<ListApplicationsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut filter = query.normalize(&state.page_limits);
    policy::narrow_application_filter(principal.role, principal.id, &mut filter)?;

    let page = state.applications.list_applications(&filter).await?;
    Ok(Json(page))
}

/// List the applications for one job
#[utoipa::path(
    get,
    path = "/api/jobs/{id}/applications",
    tag = "applications",
    params(("id" = Uuid, Path, description = "Job id"), ListApplicationsQuery),
    responses(
        (status = 200, description = "One page of applications", body = Page<ApplicationListing>),
        (status = 404, description = "Job not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(user_id = %principal.id, operation = "list_job_applications"))]
pub async fn list_job_applications(
    principal: Principal,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    LenientQuery(query): LenientQuery<ListApplicationsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let job_id = parse_job_id(&id)?;
    let mut filter = query.normalize(&state.page_limits);
    filter.job_id = Some(job_id);
    policy::narrow_application_filter(principal.role, principal.id, &mut filter)?;

    if state.jobs.get_job(job_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Job {} not found", job_id)).into());
    }

    let page = state.applications.list_applications(&filter).await?;
    Ok(Json(page))
}

#[utoipa::path(
    post,
    path = "/api/applications",
    tag = "applications",
    request_body = CreateApplicationRequest,
    responses(
        (status = 201, description = "Application submitted", body = Application),
        (status = 400, description = "Invalid application or unknown job", body = ErrorResponse),
        (status = 403, description = "Caller may not apply on this behalf", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(user_id = %principal.id, job_id = %request.job_id, operation = "create_application"))]
pub async fn create_application(
    principal: Principal,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateApplicationRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;
    let owner = policy::authorize_application_create(
        principal.role,
        principal.id,
        request.user_id,
        &request.resume_object_key,
    )?;

    let application = state
        .applications
        .create_application(&NewApplication {
            job_id: request.job_id,
            user_id: owner,
            resume_object_key: request.resume_object_key,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

