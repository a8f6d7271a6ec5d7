//! Bill split domain types.
//!
//! Request types mirror what a client submits; result types are what the
//! allocator produces and what the split book stores.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use platter_shared::types::OrderItemId;

/// A participant's claim against one line item.
///
/// Accepts either a bare item id (claims the item's full quantity) or an
/// explicit `{ "id": ..., "quantity": n }` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemClaim {
    /// Claim every unit of the item.
    Whole(OrderItemId),
    /// Claim an explicit number of units.
    Partial {
        /// Claimed line item.
        id: OrderItemId,
        /// Claimed units; signed so that non-positive input can be reported.
        quantity: i64,
    },
}

impl ItemClaim {
    /// The claimed line item.
    #[must_use]
    pub fn item_id(&self) -> OrderItemId {
        match self {
            Self::Whole(id) | Self::Partial { id, .. } => *id,
        }
    }
}

/// One named party to the split and the items they claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantInput {
    /// Display name.
    pub name: String,
    /// Claims, in the order the participant made them.
    pub items: Vec<ItemClaim>,
}

/// A request to split an order's bill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRequest {
    /// Participants; index 0 is the fallback owner of unclaimed units.
    pub participants: Vec<ParticipantInput>,
    /// Tip as a percentage of the subtotal (0 to 100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip_percent: Option<Decimal>,
    /// Explicit tip; takes precedence over `tip_percent`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip_amount: Option<Decimal>,
}

/// Units of a line item allocated to a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedItem {
    /// Line item.
    pub id: OrderItemId,
    /// Allocated units (may be zero when an over-claim was scaled away).
    pub quantity: u32,
}

/// A participant's portion of the bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantShare {
    /// Display name.
    pub name: String,
    /// Allocated items, in order line order.
    pub items: Vec<AllocatedItem>,
    /// Share of the subtotal.
    pub share_before_tip: Decimal,
    /// Share of the tip.
    pub share_tip: Decimal,
    /// `share_before_tip + share_tip`.
    pub share_total: Decimal,
    /// Whether the participant has settled their share.
    #[serde(default)]
    pub paid: bool,
}

/// The outcome of splitting a bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitResult {
    /// Sum of every line total on the order.
    pub total_before_tip: Decimal,
    /// Tip applied to the order.
    pub tip_amount: Decimal,
    /// `total_before_tip + tip_amount`.
    pub total_after_tip: Decimal,
    /// Per-participant breakdown, in request order.
    pub participants: Vec<ParticipantShare>,
}
