//! PRECINCT Telemetry - Logging Infrastructure
//!
//! Structured `tracing` output plus per-request logging middleware.

pub mod middleware;
pub mod tracer;

pub use middleware::request_logging_middleware;
pub use tracer::{init_tracing, LogFormat, TelemetryConfig};
