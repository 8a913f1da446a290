use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheckResponse {
    pub status: String,
    pub database: String,
}

/// Liveness plus a database ping
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service healthy", body = HealthCheckResponse),
        (status = 503, description = "Database unreachable", body = HealthCheckResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut response = HealthCheckResponse {
        status: "healthy".to_string(),
        database: "not_configured".to_string(),
    };
    let mut healthy = true;

    if let Some(pool) = &state.db_pool {
        match tokio::time::timeout(TIMEOUT, sqlx::query("SELECT 1").execute(pool)).await {
            Ok(Ok(_)) => {
                response.database = "healthy".to_string();
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Database health check failed");
                response.database = format!("unhealthy: {}", e);
                healthy = false;
            }
            Err(_) => {
                tracing::error!("Database health check timed out");
                response.database = "timeout".to_string();
                healthy = false;
            }
        }
    }

    let status_code = if healthy {
        StatusCode::OK
    } else {
        response.status = "unhealthy".to_string();
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
