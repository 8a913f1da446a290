use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use hireboard_core::constants::PRINCIPAL_HEADER;
use hireboard_core::AppError;
use uuid::Uuid;

use crate::auth::models::Principal;
use crate::error::HttpAppError;
use crate::state::AppState;

fn unauthorized(message: &str) -> Response {
    HttpAppError(AppError::Unauthorized(message.to_string())).into_response()
}

/// Resolves the caller from `X-Hireboard-User`.
///
/// Missing, malformed and unknown ids are all rejected with 401.
pub async fn principal_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(raw) = request
        .headers()
        .get(PRINCIPAL_HEADER)
        .and_then(|h| h.to_str().ok())
    else {
        return unauthorized("Missing user header");
    };

    let Ok(user_id) = Uuid::parse_str(raw.trim()) else {
        tracing::debug!(header = %raw, "Malformed user header");
        return unauthorized("Malformed user header");
    };

    let user = match state.users.get_user(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::debug!(user_id = %user_id, "Unknown user");
            return unauthorized("Unknown user");
        }
        Err(e) => return HttpAppError(e).into_response(),
    };

    request.extensions_mut().insert(Principal::from(user));
    next.run(request).await
}
