//! Axum Middleware for HTTP Request Logging
//!
//! Wraps every request in an `http_request` span and logs its outcome.

use axum::{extract::Request, middleware::Next, response::Response};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Instant;
use tracing::{info_span, Instrument};

static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
        .expect("Invalid UUID regex")
});

/// Normalize path for spans (replace UUIDs with a placeholder).
fn normalize_path(path: &str) -> String {
    UUID_PATTERN.replace_all(path, "{id}").into_owned()
}

/// Request logging middleware for Axum.
///
/// Server errors are logged at `error`, client errors at `warn`, everything
/// else at `info`.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let normalized_path = normalize_path(&path);

    let span = info_span!(
        "http_request",
        http.method = %method,
        http.target = %path,
        http.route = %normalized_path,
    );

    let response = next.run(request).instrument(span).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %normalized_path,
            status = status.as_u16(),
            duration_ms,
            "Request failed"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            path = %normalized_path,
            status = status.as_u16(),
            duration_ms,
            "Request rejected"
        );
    } else {
        tracing::info!(
            method = %method,
            path = %normalized_path,
            status = status.as_u16(),
            duration_ms,
            "Request completed"
        );
    }

    response
}
