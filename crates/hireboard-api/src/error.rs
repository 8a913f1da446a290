//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>` and use `?` on
//! anything that converts into `AppError`; the status, body and log level all
//! come from `ErrorMetadata`.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use hireboard_core::{AppError, ErrorMetadata, LogLevel};
use hireboard_infra::ErrorResponse;
use serde::de::DeserializeOwned;

/// Wrapper type for AppError to implement IntoResponse (orphan rule)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl<E> From<E> for HttpAppError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        HttpAppError(err.into())
    }
}

/// JSON body extractor that renders deserialization failures as a 400 with
/// the standard error body.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::InvalidInput(format!("Invalid request body: {}", rejection.body_text()))
            })?;
        Ok(ValidatedJson(inner))
    }
}

/// Query string extractor for endpoints whose parameters are all optional.
///
/// Pairs are decoded in order and folded into `T`, so repeated or unknown
/// parameters never reject the request. An undecodable query string is a 400
/// with the standard error body.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for LenientQuery<T>
where
    T: FromIterator<(String, String)>,
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::BadRequest(format!("Invalid query string: {}", rejection.body_text()))
            })?;
        Ok(LenientQuery(pairs.into_iter().collect()))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let mut body = ErrorResponse::new(app_error.client_message(), app_error.error_code())
            .with_guidance(app_error.is_recoverable(), app_error.suggested_action());
        if !is_production_env() && !app_error.is_sensitive() {
            body = body.with_details(app_error.detailed_message());
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::NotFound("job".into()), StatusCode::NOT_FOUND),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (
                AppError::MethodNotAllowed("x".into()),
                StatusCode::METHOD_NOT_ALLOWED,
            ),
            (
                AppError::Storage("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(HttpAppError(error).into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_body_carries_retry_guidance() {
        let response = HttpAppError(AppError::Storage("signer offline".into())).into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "STORAGE_ERROR");
        assert_eq!(body["recoverable"], true);
        assert_eq!(body["suggested_action"], "Retry after a short delay");

        let response = HttpAppError(AppError::Forbidden("not yours".into())).into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["recoverable"], false);
        assert!(body.get("suggested_action").is_none());
    }
}
