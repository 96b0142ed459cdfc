//! Error types for PRECINCT operations

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// FIELD ERRORS
// ============================================================================

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Payload field the message refers to (`body` for whole-payload problems)
    pub field: String,
    /// Human-readable description of the violation
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new(field, format!("{} is required", field))
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Ordered, non-empty collection of field errors from one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", summarize(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    /// Wrap a list of errors. Returns `None` when the list is empty.
    pub fn from_vec(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    pub fn single(error: FieldError) -> Self {
        Self(vec![error])
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.0
    }

    /// Whether any error names the given field.
    pub fn mentions(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

// ============================================================================
// QUERY ERRORS
// ============================================================================

/// Malformed collection-read directives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("search term 'q' must not be empty")]
    EmptySearchTerm,

    #[error("search term 'q' is required")]
    MissingSearchTerm,

    #[error("cannot sort by '{field}'; sortable fields: {}", .allowed.join(", "))]
    UnsortableField {
        field: String,
        allowed: Vec<String>,
    },

    #[error("unknown query parameter '{param}'; accepted: {}", .accepted.join(", "))]
    UnknownParameter {
        param: String,
        accepted: Vec<String>,
    },

    #[error("query parameter '{param}' must not be empty")]
    EmptyParameter { param: String },

    #[error("invalid value for query parameter '{param}': {reason}")]
    InvalidValue { param: String, reason: String },
}

// ============================================================================
// STORAGE ERRORS
// ============================================================================

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage lock poisoned for {collection}")]
    LockPoisoned { collection: &'static str },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
