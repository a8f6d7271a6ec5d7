//! Bill split error types.

use thiserror::Error;

use platter_shared::AppError;
use platter_shared::types::OrderId;

use crate::order::OrderError;

/// Errors that can occur while splitting a bill or updating a stored split.
#[derive(Debug, Error)]
pub enum SplitError {
    /// The request failed validation; nothing was computed.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Path of the offending field, e.g. `participants[1].items[0].quantity`.
        field: String,
        /// Why the field was rejected.
        message: String,
    },

    /// The order itself does not allow splitting.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// No split is stored for the order.
    #[error("No bill split found for order {0}")]
    SplitNotFound(OrderId),

    /// The stored split has no participant at the given position.
    #[error("Bill split for order {order_id} has no participant at index {index}")]
    ParticipantNotFound {
        /// The order whose split was addressed.
        order_id: OrderId,
        /// The requested participant index.
        index: usize,
    },
}

impl SplitError {
    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Order(err) => err.error_code(),
            Self::SplitNotFound(_) => "SPLIT_NOT_FOUND",
            Self::ParticipantNotFound { .. } => "PARTICIPANT_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Order(err) => err.http_status_code(),
            Self::SplitNotFound(_) | Self::ParticipantNotFound { .. } => 404,
        }
    }

    /// Offending field for validation errors.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<SplitError> for AppError {
    fn from(err: SplitError) -> Self {
        match err {
            SplitError::Validation { field, message } => AppError::Validation { field, message },
            SplitError::Order(inner) => inner.into(),
            missing @ (SplitError::SplitNotFound(_) | SplitError::ParticipantNotFound { .. }) => {
                AppError::NotFound(missing.to_string())
            }
        }
    }
}
