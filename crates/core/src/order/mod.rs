//! Order placement and the kitchen status workflow.
//!
//! # Modules
//!
//! - `types` - Order domain types (Order, OrderItem, OrderStatus)
//! - `error` - Order-specific error types
//! - `service` - Placement and state transition logic

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::OrderError;
pub use service::OrderService;
pub use types::{NewOrderItem, Order, OrderItem, OrderStatus, PlaceOrderInput};
