//! Order error types.

use rust_decimal::Decimal;
use thiserror::Error;

use platter_shared::AppError;
use platter_shared::types::OrderId;

use crate::order::types::OrderStatus;

/// Maximum length of the kitchen notes on an order.
pub const MAX_NOTES_LENGTH: usize = 500;

/// Errors that can occur while placing or progressing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Order must contain at least one item.
    #[error("Order must contain at least one item")]
    NoItems,

    /// Item quantity must be at least one.
    #[error("Item {index} quantity must be at least 1, got {quantity}")]
    InvalidQuantity {
        /// Position of the item in the request.
        index: usize,
        /// The rejected quantity.
        quantity: i64,
    },

    /// Item price must be non-negative with at most two decimals.
    #[error("Item {index} has an invalid unit price {price}")]
    InvalidPrice {
        /// Position of the item in the request.
        index: usize,
        /// The rejected price.
        price: Decimal,
    },

    /// Line totals no longer fit in a decimal amount.
    #[error("Item {index} pushes the order total out of range")]
    TotalOverflow {
        /// Position of the first item that overflows.
        index: usize,
    },

    /// Notes exceed the allowed length.
    #[error("Notes may not exceed 500 characters")]
    NotesTooLong,

    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: OrderStatus,
        /// The attempted target status.
        to: OrderStatus,
    },

    /// A cancelled order cannot be split.
    #[error("Cannot split cancelled order {0}")]
    Cancelled(OrderId),
}

impl OrderError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoItems => "NO_ITEMS",
            Self::InvalidQuantity { .. } => "INVALID_QUANTITY",
            Self::InvalidPrice { .. } => "INVALID_PRICE",
            Self::TotalOverflow { .. } => "TOTAL_OVERFLOW",
            Self::NotesTooLong => "NOTES_TOO_LONG",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Cancelled(_) => "ORDER_CANCELLED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NoItems
            | Self::InvalidQuantity { .. }
            | Self::InvalidPrice { .. }
            | Self::TotalOverflow { .. }
            | Self::NotesTooLong => 400,
            Self::InvalidTransition { .. } | Self::Cancelled(_) => 422,
        }
    }

    /// Name of the request field the error refers to, if any.
    #[must_use]
    pub fn field(&self) -> Option<String> {
        match self {
            Self::NoItems => Some("items".to_string()),
            Self::InvalidQuantity { index, .. } => Some(format!("items[{index}].quantity")),
            Self::InvalidPrice { index, .. } => Some(format!("items[{index}].unit_price")),
            Self::TotalOverflow { index } => Some(format!("items[{index}]")),
            Self::NotesTooLong => Some("notes".to_string()),
            Self::InvalidTransition { .. } | Self::Cancelled(_) => None,
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err.field() {
            Some(field) => AppError::validation(field, err.to_string()),
            None => AppError::BusinessRule(err.to_string()),
        }
    }
}
