//! Route configuration and setup

use std::sync::Arc;

use axum::{
    http::{HeaderName, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use hireboard_core::constants::PRINCIPAL_HEADER;
use hireboard_core::Config;
use hireboard_infra::{request_id_middleware, security_headers_middleware};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::auth::principal_middleware;
use crate::handlers;
use crate::state::AppState;

/// Request bodies are small JSON documents; files go straight to S3.
const MAX_BODY_BYTES: usize = 64 * 1024;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let app = public_routes()
        .merge(protected_routes(state.clone()))
        .method_not_allowed_fallback(handlers::fallback::method_not_allowed)
        .fallback(handlers::fallback::route_not_found)
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let principal_header = HeaderName::from_bytes(PRINCIPAL_HEADER.as_bytes())
        .map_err(|e| anyhow::anyhow!("Invalid principal header name: {}", e))?;

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                principal_header,
            ])
    };
    Ok(cors)
}

/// Routes that do not need a principal
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

/// Routes behind the principal middleware
fn protected_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .merge(job_routes())
        .merge(application_routes())
        .merge(file_routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            principal_middleware,
        ))
}

fn job_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/jobs",
            get(handlers::jobs::list_jobs).post(handlers::jobs::create_job),
        )
        .route(
            "/api/jobs/{id}",
            get(handlers::jobs::get_job)
                .put(handlers::jobs::update_job)
                .delete(handlers::jobs::delete_job),
        )
        .route(
            "/api/jobs/{id}/applications",
            get(handlers::applications::list_job_applications),
        )
}

fn application_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/applications",
        get(handlers::applications::list_applications)
            .post(handlers::applications::create_application),
    )
}

fn file_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/files", axum::routing::post(handlers::files::upload_file))
        .route(
            "/api/files/{*object_key}",
            get(handlers::files::download_file),
        )
}
