//! Validation pre-pass for bill split requests.
//!
//! Runs to completion before any money is computed. On success every claim
//! is resolved to an order line index and a concrete unit count.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::warn;

use platter_shared::SplitConfig;
use platter_shared::types::OrderItemId;

use super::error::SplitError;
use super::types::{ItemClaim, SplitRequest};
use crate::order::{Order, OrderService};

/// A claim resolved against the order snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedClaim {
    /// Position of the line item in `order.items`.
    pub item_index: usize,
    /// Claimed units; a bare id resolves to the item's full quantity.
    pub quantity: u64,
}

/// Validates a split request against an order.
///
/// The order snapshot is checked first, since it arrives from outside just
/// like the request. Returns, per participant, the claims that refer to lines
/// of this order.
///
/// # Errors
///
/// Returns `SplitError::Validation` naming the first offending field.
pub fn validate_request(
    order: &Order,
    request: &SplitRequest,
    config: &SplitConfig,
) -> Result<Vec<Vec<ResolvedClaim>>, SplitError> {
    OrderService::validate_items(order).map_err(|err| match err.field() {
        Some(field) => SplitError::validation(field, err.to_string()),
        None => SplitError::Order(err),
    })?;

    if request.participants.is_empty() {
        return Err(SplitError::validation(
            "participants",
            "At least one participant is required",
        ));
    }

    let lines: HashMap<OrderItemId, usize> = order
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| (item.id, index))
        .collect();

    let mut resolved = Vec::with_capacity(request.participants.len());
    for (i, participant) in request.participants.iter().enumerate() {
        let name = participant.name.trim();
        if name.is_empty() {
            return Err(SplitError::validation(
                format!("participants[{i}].name"),
                "Name is required",
            ));
        }
        if name.chars().count() > config.max_name_length {
            return Err(SplitError::validation(
                format!("participants[{i}].name"),
                format!("Name may not exceed {} characters", config.max_name_length),
            ));
        }
        if participant.items.is_empty() {
            return Err(SplitError::validation(
                format!("participants[{i}].items"),
                "At least one item is required",
            ));
        }

        let mut claims = Vec::with_capacity(participant.items.len());
        for (j, claim) in participant.items.iter().enumerate() {
            let explicit = match claim {
                ItemClaim::Whole(_) => None,
                ItemClaim::Partial { quantity, .. } => match u64::try_from(*quantity) {
                    Ok(q) if q > 0 => Some(q),
                    _ => {
                        return Err(SplitError::validation(
                            format!("participants[{i}].items[{j}].quantity"),
                            format!("Quantity must be positive, got {quantity}"),
                        ));
                    }
                },
            };

            let item_id = claim.item_id();
            let Some(&item_index) = lines.get(&item_id) else {
                if config.reject_unknown_items {
                    return Err(SplitError::validation(
                        format!("participants[{i}].items[{j}]"),
                        format!("Item {item_id} is not part of order {}", order.id),
                    ));
                }
                warn!(
                    order_id = %order.id,
                    item_id = %item_id,
                    participant = i,
                    "Skipping claim on item outside the order"
                );
                continue;
            };

            let quantity =
                explicit.unwrap_or_else(|| u64::from(order.items[item_index].quantity));
            claims.push(ResolvedClaim {
                item_index,
                quantity,
            });
        }
        resolved.push(claims);
    }

    if let Some(percent) = request.tip_percent {
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(SplitError::validation(
                "tip_percent",
                format!("Tip percent must be between 0 and 100, got {percent}"),
            ));
        }
    }
    if let Some(amount) = request.tip_amount {
        if amount < Decimal::ZERO {
            return Err(SplitError::validation(
                "tip_amount",
                format!("Tip amount cannot be negative, got {amount}"),
            ));
        }
    }

    Ok(resolved)
}
