//! Responses for requests that match no handler

use axum::http::{Method, Uri};
use hireboard_core::AppError;

use crate::error::HttpAppError;

/// No route matches the path
pub async fn route_not_found(uri: Uri) -> HttpAppError {
    AppError::NotFound(format!("No route for {}", uri.path())).into()
}

/// The path exists but not for this method
pub async fn method_not_allowed(method: Method, uri: Uri) -> HttpAppError {
    AppError::MethodNotAllowed(format!("{} is not supported on {}", method, uri.path())).into()
}
