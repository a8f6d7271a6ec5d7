//! In-memory split book.
//!
//! Holds the current bill split for each order. A split is never patched:
//! every recomputation replaces the previous record wholesale with a single
//! map insert, so readers see either the old split or the new one.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use platter_shared::SplitConfig;
use platter_shared::types::{BillSplitId, OrderId};

use super::error::SplitError;
use super::service::SplitService;
use super::types::{ParticipantShare, SplitRequest, SplitResult};
use crate::order::Order;

/// Stored form of a bill split, one per order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRecord {
    /// Record identifier; changes on every replace.
    pub id: BillSplitId,
    /// Order the split belongs to.
    pub order_id: OrderId,
    /// Subtotal.
    pub total_before_tip: Decimal,
    /// Tip.
    pub tip_amount: Decimal,
    /// Subtotal plus tip.
    pub total_after_tip: Decimal,
    /// Participant breakdown, kept as a list.
    pub participants: Vec<ParticipantShare>,
    /// When this split was computed.
    pub created_at: DateTime<Utc>,
}

impl SplitRecord {
    fn new(order_id: OrderId, result: SplitResult) -> Self {
        Self {
            id: BillSplitId::new(),
            order_id,
            total_before_tip: result.total_before_tip,
            tip_amount: result.tip_amount,
            total_after_tip: result.total_after_tip,
            participants: result.participants,
            created_at: Utc::now(),
        }
    }

    /// Returns true once every participant has paid.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.participants.iter().all(|p| p.paid)
    }

    /// Sum of the shares still owed.
    #[must_use]
    pub fn outstanding(&self) -> Decimal {
        self.participants
            .iter()
            .filter(|p| !p.paid)
            .map(|p| p.share_total)
            .sum()
    }
}

/// Concurrent store of the latest split per order.
#[derive(Debug, Default)]
pub struct SplitBook {
    splits: DashMap<OrderId, SplitRecord>,
}

impl SplitBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes a fresh split for `order` and replaces any stored one.
    ///
    /// On error the previously stored split is left untouched.
    pub fn recompute(
        &self,
        order: &Order,
        request: &SplitRequest,
        config: &SplitConfig,
    ) -> Result<SplitRecord, SplitError> {
        let result = SplitService::compute(order, request, config)?;
        Ok(self.replace(order.id, result))
    }

    /// Stores `result` as the split of `order_id`, discarding the old one.
    pub fn replace(&self, order_id: OrderId, result: SplitResult) -> SplitRecord {
        let record = SplitRecord::new(order_id, result);
        let previous = self.splits.insert(order_id, record.clone());
        info!(
            order_id = %order_id,
            split_id = %record.id,
            replaced = previous.is_some(),
            "Bill split stored"
        );
        record
    }

    /// Returns the current split of an order.
    #[must_use]
    pub fn get(&self, order_id: OrderId) -> Option<SplitRecord> {
        self.splits.get(&order_id).map(|entry| entry.value().clone())
    }

    /// Marks one participant of an order's split as paid.
    pub fn mark_paid(&self, order_id: OrderId, index: usize) -> Result<SplitRecord, SplitError> {
        let mut entry = self
            .splits
            .get_mut(&order_id)
            .ok_or(SplitError::SplitNotFound(order_id))?;
        let participant = entry
            .participants
            .get_mut(index)
            .ok_or(SplitError::ParticipantNotFound { order_id, index })?;
        participant.paid = true;
        info!(order_id = %order_id, participant = index, "Participant marked paid");
        Ok(entry.value().clone())
    }

    /// Drops the split of an order, returning it if one existed.
    pub fn remove(&self, order_id: OrderId) -> Option<SplitRecord> {
        self.splits.remove(&order_id).map(|(_, record)| record)
    }

    /// Number of orders with a stored split.
    #[must_use]
    pub fn len(&self) -> usize {
        self.splits.len()
    }

    /// Returns true if no split is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }
}
