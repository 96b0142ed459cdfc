//! Error Types for PRECINCT API
//!
//! This module defines error handling for the API layer, including:
//! - ApiError struct for structured error responses
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation for Axum HTTP responses
//!
//! All errors are serialized as JSON with appropriate HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use precinct_core::{FieldError, QueryError, StorageError, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
///
/// Each error code maps to a specific HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Client Errors (400, 413)
    // ========================================================================
    /// Payload failed schema validation; see `errors`
    ValidationFailed,

    /// Malformed collection-read directives (filters, sort, search term)
    InvalidQuery,

    /// Request body is not parseable JSON
    InvalidInput,

    /// Path identifier is not a UUID
    InvalidFormat,

    /// Request body exceeds the configured limit (413)
    PayloadTooLarge,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    /// Requested agent does not exist
    AgentNotFound,

    /// Requested case does not exist
    CaseNotFound,

    /// Search matched nothing
    NoMatches,

    /// No route matches the request
    RouteNotFound,

    // ========================================================================
    // Method Errors (405)
    // ========================================================================
    /// The path exists but does not accept this method
    MethodNotAllowed,

    // ========================================================================
    // Conflict Errors (409)
    // ========================================================================
    /// A case write names an agent that does not exist
    ReferencedAgentNotFound,

    // ========================================================================
    // Server Errors (500)
    // ========================================================================
    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationFailed
            | ErrorCode::InvalidQuery
            | ErrorCode::InvalidInput
            | ErrorCode::InvalidFormat => StatusCode::BAD_REQUEST,

            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            ErrorCode::AgentNotFound
            | ErrorCode::CaseNotFound
            | ErrorCode::NoMatches
            | ErrorCode::RouteNotFound => StatusCode::NOT_FOUND,

            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,

            ErrorCode::ReferencedAgentNotFound => StatusCode::CONFLICT,

            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Request validation failed",
            ErrorCode::InvalidQuery => "Invalid query parameters",
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::PayloadTooLarge => "Request body is too large",
            ErrorCode::AgentNotFound => "Agent not found",
            ErrorCode::CaseNotFound => "Case not found",
            ErrorCode::NoMatches => "No cases match the search term",
            ErrorCode::RouteNotFound => "Route not found",
            ErrorCode::MethodNotAllowed => "Method not allowed",
            ErrorCode::ReferencedAgentNotFound => "Referenced agent does not exist",
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response for API operations.
///
/// Every non-2xx response carries this body, including extractor rejections
/// and unmatched routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Field-level problems, in the order they were found
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    /// Attach field-level errors.
    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = errors;
        self
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    /// Create a ValidationFailed error carrying the given field errors.
    pub fn validation_failed(errors: Vec<FieldError>) -> Self {
        Self::from_code(ErrorCode::ValidationFailed).with_errors(errors)
    }

    /// Create an InvalidQuery error.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidQuery, message)
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Create an InvalidFormat error.
    pub fn invalid_format(field: &str, expected: &str) -> Self {
        Self::new(
            ErrorCode::InvalidFormat,
            format!("Invalid format for '{}': expected {}", field, expected),
        )
    }

    pub fn agent_not_found(agent_id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::AgentNotFound,
            format!("Agent not found: {}", agent_id),
        )
    }

    pub fn case_not_found(case_id: impl fmt::Display) -> Self {
        Self::new(ErrorCode::CaseNotFound, format!("Case not found: {}", case_id))
    }

    /// Create a NoMatches error for a search term.
    pub fn no_matches(term: &str) -> Self {
        Self::new(
            ErrorCode::NoMatches,
            format!("No cases match '{}'", term.trim()),
        )
    }

    pub fn route_not_found(method: impl fmt::Display, path: &str) -> Self {
        Self::new(
            ErrorCode::RouteNotFound,
            format!("No route for {} {}", method, path),
        )
    }

    pub fn method_not_allowed(method: impl fmt::Display, path: &str) -> Self {
        Self::new(
            ErrorCode::MethodNotAllowed,
            format!("{} is not supported on {}", method, path),
        )
    }

    /// Create a ReferencedAgentNotFound error.
    pub fn referenced_agent_not_found(agent_id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::ReferencedAgentNotFound,
            format!("Referenced agent does not exist: {}", agent_id),
        )
        .with_errors(vec![FieldError::new(
            "agentId",
            format!("no agent with id {}", agent_id),
        )])
    }

    /// Create an InternalError. The message is returned to the client verbatim.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

/// Implement IntoResponse for ApiError to enable automatic error handling in Axum.
///
/// ```ignore
/// async fn handler() -> Result<Json<Agent>, ApiError> {
///     Err(ApiError::agent_not_found(id))
/// }
/// ```
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self);
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM DOMAIN ERRORS
// ============================================================================

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        ApiError::validation_failed(err.into_errors())
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::invalid_query(err.to_string())
    }
}

/// Storage failures never leak their details to the client.
impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "Storage error");
        ApiError::from_code(ErrorCode::InternalError)
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(ErrorCode::ValidationFailed.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidQuery.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidFormat.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::CaseNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::NoMatches.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ErrorCode::ReferencedAgentNotFound.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_api_error_constructors() {
        let err = ApiError::agent_not_found("123");
        assert_eq!(err.code, ErrorCode::AgentNotFound);
        assert!(err.message.contains("123"));
        assert!(err.errors.is_empty());

        let err = ApiError::referenced_agent_not_found("abc");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.errors[0].field, "agentId");
    }

    #[test]
    fn test_from_validation_errors_keeps_order() {
        let errors = ValidationErrors::from_vec(vec![
            FieldError::required("title"),
            FieldError::new("status", "status must be one of: open, in-progress, solved"),
        ])
        .expect("non-empty");
        let err = ApiError::from(errors);
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let fields: Vec<_> = err.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "status"]);
    }

    #[test]
    fn test_storage_error_is_generic() {
        let err = ApiError::from(StorageError::LockPoisoned { collection: "Agent" });
        assert_eq!(err.code, ErrorCode::InternalError);
        assert!(!err.message.contains("poison"));
    }

    #[test]
    fn test_error_serialization() -> Result<(), serde_json::Error> {
        let err = ApiError::invalid_query("search term 'q' must not be empty");
        let json = serde_json::to_value(&err)?;

        assert_eq!(json["code"], "INVALID_QUERY");
        assert!(json.get("errors").is_none());

        let deserialized: ApiError = serde_json::from_value(json)?;
        assert_eq!(deserialized, err);
        Ok(())
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::case_not_found("42");
        let display = format!("{}", err);

        assert!(display.contains("CaseNotFound"));
        assert!(display.contains("42"));
    }
}
