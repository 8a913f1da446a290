use std::fmt;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use hireboard_core::{AppError, Role, User};
use uuid::Uuid;

use crate::error::HttpAppError;

/// The authenticated caller
#[derive(Clone)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
    pub totp_secret: String,
}

impl From<User> for Principal {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            totp_secret: user.totp_secret,
        }
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("id", &self.id)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(|| HttpAppError(AppError::Unauthorized("Missing principal".to_string())))
    }
}
