//! REST API Routes Module
//!
//! Assembles the agent, case and health routers into a single application
//! router with body limits, request logging and CORS applied.

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{header, HeaderValue, Method, StatusCode, Uri},
    middleware::{from_fn, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;
use crate::telemetry::request_logging_middleware;

pub mod agent;
pub mod case;
pub mod health;

/// Plain-text greeting served at `/`.
pub const WELCOME_TEXT: &str = "Precinct API: agents and cases of the police department";

// ============================================================================
// TOP-LEVEL HANDLERS
// ============================================================================

async fn welcome() -> &'static str {
    WELCOME_TEXT
}

/// Handler for /openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Anything no router claimed.
async fn route_not_found(method: Method, uri: Uri) -> ApiError {
    tracing::debug!(method = %method, path = %uri.path(), "No route matched");
    ApiError::route_not_found(method, uri.path())
}

/// Give axum's empty 405 the standard error body. The `Allow` header is kept.
async fn method_not_allowed_body(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut rejected = ApiError::method_not_allowed(method, &path).into_response();
    if let Some(allow) = allow {
        rejected.headers_mut().insert(header::ALLOW, allow);
    }
    rejected
}

// ============================================================================
// ROUTER ASSEMBLY
// ============================================================================

/// Create the complete API router.
///
/// Unmatched paths and unsupported methods both answer with an [`ApiError`].
pub fn create_api_router(state: AppState, config: &ApiConfig) -> Router {
    let router = Router::new()
        .route("/", get(welcome))
        .route("/openapi.json", get(openapi_json))
        .nest("/agents", agent::create_router())
        .nest("/cases", case::create_router())
        .nest("/health", health::create_router());

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa_swagger_ui::SwaggerUi;
        router.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
    };

    router
        .fallback(route_not_found)
        .with_state(state)
        .layer(from_fn(method_not_allowed_body))
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(from_fn(request_logging_middleware))
        .layer(build_cors_layer(config))
}

/// Build the CORS layer; an empty origin list allows any origin.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if !config.has_strict_cors() {
        tracing::info!("CORS: allowing all origins");
        return cors.allow_origin(Any).allow_headers(Any);
    }

    tracing::info!(origins = ?config.cors_origins, "CORS: restricted origins");
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    let cors = cors
        .allow_origin(origins)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);
    if config.cors_allow_credentials {
        cors.allow_credentials(true)
    } else {
        cors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_openapi_json_endpoint_exists() {
        let app = create_api_router(AppState::default(), &ApiConfig::default());
        let response = app
            .oneshot(Request::get("/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_strict_cors_echoes_listed_origin() {
        let config = ApiConfig {
            cors_origins: vec!["https://precinct.example".to_string()],
            ..Default::default()
        };
        let app = create_api_router(AppState::default(), &config);
        let response = app
            .oneshot(
                Request::get("/health/ping")
                    .header(header::ORIGIN, "https://precinct.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://precinct.example"
        );
    }
}
