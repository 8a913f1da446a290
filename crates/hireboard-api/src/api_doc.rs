//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use hireboard_core::constants::PRINCIPAL_HEADER;
use hireboard_core::models;
use hireboard_infra::ErrorResponse;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

struct PrincipalHeader;

impl Modify for PrincipalHeader {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "principal",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(PRINCIPAL_HEADER))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hireboard API",
        version = "0.1.0",
        description = "Job postings, applications and presigned resume transfers. Every /api route except this document expects the caller's user id in the X-Hireboard-User header."
    ),
    paths(
        handlers::jobs::list_jobs,
        handlers::jobs::get_job,
        handlers::jobs::create_job,
        handlers::jobs::update_job,
        handlers::jobs::delete_job,
        handlers::applications::list_applications,
        handlers::applications::list_job_applications,
        handlers::applications::create_application,
        handlers::files::upload_file,
        handlers::files::download_file,
        handlers::health::health_check,
    ),
    components(schemas(
        models::Job,
        models::JobInput,
        models::JobType,
        models::Application,
        models::ApplicationListing,
        models::ApplicationStatus,
        models::CreateApplicationRequest,
        models::UploadFileRequest,
        models::UploadFileResponse,
        models::DownloadFileResponse,
        handlers::health::HealthCheckResponse,
        ErrorResponse,
    )),
    modifiers(&PrincipalHeader),
    security(("principal" = [])),
    tags(
        (name = "jobs", description = "Job postings"),
        (name = "applications", description = "Job applications"),
        (name = "files", description = "Presigned resume uploads and downloads"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
