//! PRECINCT API - REST Layer
//!
//! Axum routers over the in-memory agent and case stores. Payloads are
//! validated by `precinct-core`, collection reads go through its query
//! engine, and every failure leaves as an [`ApiError`] JSON body.

pub mod config;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use state::AppState;
