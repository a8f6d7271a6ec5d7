//! Application-wide error types.

use serde::Serialize;
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error on a specific input field.
    #[error("Validation error on {field}: {message}")]
    Validation {
        /// Path of the offending field (e.g. `participants[0].name`).
        field: String,
        /// Human readable reason.
        message: String,
    },

    /// Business rule violation.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),
}

/// Serializable error payload returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Stable machine readable code.
    pub code: &'static str,
    /// HTTP-equivalent status code.
    pub status: u16,
    /// Human readable message.
    pub message: String,
    /// Offending field, for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    /// Shorthand for a field validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation { .. } => 400,
            Self::BusinessRule(_) => 422,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
        }
    }

    /// Builds the error payload for this error.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        let field = match self {
            Self::Validation { field, .. } => Some(field.clone()),
            _ => None,
        };
        ErrorBody {
            code: self.error_code(),
            status: self.status_code(),
            message: self.to_string(),
            field,
        }
    }
}
