use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};

/// Security headers middleware
///
/// The API only serves JSON, so the content security policy denies everything.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert("Referrer-Policy", HeaderValue::from_static("no-referrer"));
    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    // Presigned URLs must not end up in shared caches
    headers.insert("Cache-Control", HeaderValue::from_static("no-store"));

    response
}
