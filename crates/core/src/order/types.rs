//! Order domain types.
//!
//! An order is a snapshot of line items plus the status the kitchen has
//! moved it to. Line items are immutable once the order is placed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use platter_shared::types::{Currency, Money, OrderId, OrderItemId};

use crate::order::error::OrderError;

/// Order status in the kitchen workflow.
///
/// The valid transitions are:
/// - Pending → Preparing | Cancelled
/// - Preparing → Ready | Cancelled
/// - Ready → Delivered | Cancelled
/// - Delivered and Cancelled are terminal
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order has been placed and is waiting for the kitchen.
    #[default]
    Pending,
    /// Kitchen is preparing the order.
    Preparing,
    /// Order is ready to be served.
    Ready,
    /// Order has been delivered to the table.
    Delivered,
    /// Order has been cancelled.
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in workflow order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Preparing,
        Self::Ready,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "preparing" => Some(Self::Preparing),
            "ready" => Some(Self::Ready),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Returns true if the kitchen still has work to do on the order.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Preparing)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One ordered dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Line item identifier.
    pub id: OrderItemId,
    /// Dish name shown on the bill.
    #[serde(default)]
    pub name: String,
    /// Price of a single unit.
    pub unit_price: Decimal,
    /// Number of units ordered.
    pub quantity: u32,
}

impl OrderItem {
    /// Unit price times quantity, unrounded. `None` if it overflows.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier.
    pub id: OrderId,
    /// Current workflow status.
    #[serde(default)]
    pub status: OrderStatus,
    /// Currency every price on the order is expressed in.
    #[serde(default)]
    pub currency: Currency,
    /// Line items, in the order they were placed.
    pub items: Vec<OrderItem>,
    /// Free-form notes for the kitchen.
    #[serde(default)]
    pub notes: Option<String>,
    /// When the order was placed.
    #[serde(default = "Utc::now")]
    pub placed_at: DateTime<Utc>,
}

impl Order {
    /// Sum of every line total.
    ///
    /// Fails with `OrderError::TotalOverflow` naming the first line whose
    /// total no longer fits.
    pub fn total(&self) -> Result<Money, OrderError> {
        let mut amount = Decimal::ZERO;
        for (index, item) in self.items.iter().enumerate() {
            amount = item
                .line_total()
                .and_then(|line| amount.checked_add(line))
                .ok_or(OrderError::TotalOverflow { index })?;
        }
        Ok(Money::new(amount, self.currency))
    }

    /// Returns true if the order has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status == OrderStatus::Cancelled
    }
}

/// Input for a single line item when placing an order.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderItem {
    /// Dish name.
    pub name: String,
    /// Price of a single unit.
    pub unit_price: Decimal,
    /// Requested quantity; signed so that bad input can be reported.
    pub quantity: i64,
}

/// Input for placing an order.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderInput {
    /// Currency of the menu prices.
    #[serde(default)]
    pub currency: Currency,
    /// Requested line items.
    pub items: Vec<NewOrderItem>,
    /// Optional notes for the kitchen.
    #[serde(default)]
    pub notes: Option<String>,
}
