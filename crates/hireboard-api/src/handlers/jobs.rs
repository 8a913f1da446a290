use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use hireboard_core::filter::ListJobsQuery;
use hireboard_core::policy::{self, Operation};
use hireboard_core::{AppError, Job, JobInput, Page};
use hireboard_infra::ErrorResponse;
use uuid::Uuid;
use validator::Validate;

use crate::auth::Principal;
use crate::error::{HttpAppError, LenientQuery, ValidatedJson};
use crate::state::AppState;

/// Ids that do not parse cannot name an existing job
pub(crate) fn parse_job_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Job {} not found", raw)))
}

/// List jobs, newest first
#[utoipa::path(
    get,
    path = "/api/jobs",
    tag = "jobs",
    params(ListJobsQuery),
    responses(
        (status = 200, description = "One page of jobs", body = Page<Job>),
        (status = 401, description = "Unknown caller", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(user_id = %principal.id, operation = "list_jobs"))]
pub async fn list_jobs(
    principal: Principal,
    State(state): State<Arc<AppState>>,
    LenientQuery(query): LenientQuery<ListJobsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    policy::authorize(principal.role, Operation::ListJobs)?;

    let filter = query.normalize(&state.page_limits);
    let page = state.jobs.list_jobs(&filter).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    tag = "jobs",
    params(("id" = Uuid, Path, description = "Job id")),
    responses(
        (status = 200, description = "Job found", body = Job),
        (status = 404, description = "Job not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(user_id = %principal.id, operation = "get_job"))]
pub async fn get_job(
    principal: Principal,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    policy::authorize(principal.role, Operation::GetJob)?;

    let id = parse_job_id(&id)?;
    let job = state
        .jobs
        .get_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", id)))?;
    Ok(Json(job))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    tag = "jobs",
    request_body = JobInput,
    responses(
        (status = 201, description = "Job created", body = Job),
        (status = 400, description = "Invalid job", body = ErrorResponse),
        (status = 403, description = "Caller may not post jobs", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, input), fields(user_id = %principal.id, operation = "create_job"))]
pub async fn create_job(
    principal: Principal,
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<JobInput>,
) -> Result<impl IntoResponse, HttpAppError> {
    policy::authorize(principal.role, Operation::MutateJob)?;
    input.validate()?;

    let job = state.jobs.create_job(&input).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    tag = "jobs",
    params(("id" = Uuid, Path, description = "Job id")),
    request_body = JobInput,
    responses(
        (status = 200, description = "Job updated", body = Job),
        (status = 400, description = "Invalid job", body = ErrorResponse),
        (status = 403, description = "Caller may not edit jobs", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, input), fields(user_id = %principal.id, operation = "update_job"))]
pub async fn update_job(
    principal: Principal,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<JobInput>,
) -> Result<impl IntoResponse, HttpAppError> {
    policy::authorize(principal.role, Operation::MutateJob)?;
    let id = parse_job_id(&id)?;
    input.validate()?;

    let job = state
        .jobs
        .update_job(id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", id)))?;
    Ok(Json(job))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    tag = "jobs",
    params(("id" = Uuid, Path, description = "Job id")),
    responses(
        (status = 204, description = "Job and its applications deleted"),
        (status = 403, description = "Caller may not delete jobs", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(user_id = %principal.id, operation = "delete_job"))]
pub async fn delete_job(
    principal: Principal,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    policy::authorize(principal.role, Operation::MutateJob)?;
    let id = parse_job_id(&id)?;

    if !state.jobs.delete_job(id).await? {
        return Err(AppError::NotFound(format!("Job {} not found", id)).into());
    }
    Ok(StatusCode::NO_CONTENT)
}
