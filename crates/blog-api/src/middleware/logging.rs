//! Request/response access log.

use std::time::Instant;

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

use super::request_id::REQUEST_ID_HEADER;

/// Response header with the handling time in milliseconds.
pub const PROCESS_TIME_HEADER: HeaderName = HeaderName::from_static("x-process-time-ms");

/// Logs method, path, status and duration, and stamps the duration on the
/// response.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let start = Instant::now();

    let mut response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis() as u64;
    response
        .headers_mut()
        .insert(PROCESS_TIME_HEADER, HeaderValue::from(duration_ms));

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms,
        request_id = %request_id,
        "HTTP request"
    );

    response
}
