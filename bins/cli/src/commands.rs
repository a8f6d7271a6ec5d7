//! Command handlers.
//!
//! Each handler maps its input to a serializable response or an `AppError`;
//! printing and exit codes are left to `main`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use platter_core::order::{Order, OrderService, OrderStatus};
use platter_core::split::{SplitBook, SplitRecord, SplitRequest};
use platter_shared::{AppError, AppResult, SplitConfig};

/// Body of a `split` invocation.
#[derive(Debug, Deserialize)]
pub struct SplitInput {
    /// Order snapshot the split is computed from.
    pub order: Order,
    /// Participants and tip.
    pub request: SplitRequest,
}

/// Parses a split body, computes the split and stores it in `book`.
pub fn split(body: &str, book: &SplitBook, config: &SplitConfig) -> AppResult<SplitRecord> {
    let input: SplitInput = serde_json::from_str(body)
        .map_err(|e| AppError::validation("body", format!("Malformed split request: {e}")))?;

    let record = book
        .recompute(&input.order, &input.request, config)
        .map_err(|e| {
            error!(order_id = %input.order.id, code = e.error_code(), "Bill split rejected: {e}");
            AppError::from(e)
        })?;
    info!(order_id = %record.order_id, split_id = %record.id, "Bill split ready");
    Ok(record)
}

/// Kitchen and manager views over a list of orders.
#[derive(Debug, Serialize)]
pub struct OrdersView<'a> {
    /// Orders matching the status filter, newest first.
    pub orders: Vec<&'a Order>,
    /// Pending and preparing orders, oldest first.
    pub kitchen_queue: Vec<&'a Order>,
    /// Number of orders per status.
    pub counts: BTreeMap<OrderStatus, usize>,
}

/// Parses a JSON list of orders.
pub fn parse_orders(body: &str) -> AppResult<Vec<Order>> {
    serde_json::from_str(body)
        .map_err(|e| AppError::validation("body", format!("Malformed order list: {e}")))
}

/// Builds the order views, optionally filtered to one status.
pub fn orders<'a>(orders: &'a [Order], status: Option<&str>) -> AppResult<OrdersView<'a>> {
    let status = status
        .map(|value| {
            OrderStatus::parse(value)
                .ok_or_else(|| AppError::validation("status", format!("Unknown order status: {value}")))
        })
        .transpose()?;
    Ok(OrdersView {
        orders: OrderService::filter_by_status(orders, status),
        kitchen_queue: OrderService::kitchen_queue(orders),
        counts: OrderService::status_counts(orders),
    })
}

/// Validates a kitchen status transition given as two status names.
pub fn transition(from: &str, to: &str) -> AppResult<OrderStatus> {
    let parse = |field: &str, value: &str| {
        OrderStatus::parse(value)
            .ok_or_else(|| AppError::validation(field, format!("Unknown order status: {value}")))
    };
    let from = parse("from", from)?;
    let to = parse("to", to)?;
    Ok(OrderService::transition(from, to)?)
}
