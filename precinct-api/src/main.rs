//! PRECINCT API Server Entry Point
//!
//! Reads configuration from the environment, builds empty stores and serves
//! the router until Ctrl-C.

use std::sync::Arc;

use axum::Router;
use precinct_api::telemetry::{init_tracing, TelemetryConfig};
use precinct_api::{create_api_router, ApiConfig, ApiError, ApiResult, AppState};
use precinct_storage::Stores;

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::default();
    init_tracing(&telemetry_config)?;

    let api_config = ApiConfig::from_env()
        .map_err(|e| ApiError::internal_error(format!("Invalid configuration: {}", e)))?;
    let addr = api_config
        .bind_addr()
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    let state = AppState::new(Arc::new(Stores::new()));
    let app: Router = create_api_router(state, &api_config);

    tracing::info!(%addr, body_limit_bytes = api_config.body_limit_bytes, "Starting PRECINCT API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;

    tracing::info!("PRECINCT API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}
