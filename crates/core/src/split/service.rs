//! Bill split service.
//!
//! Turns an order snapshot and a split request into per-participant shares.
//! Rounding happens only where a value is finalised:
//! - each participant's before-tip share
//! - the tip when derived from a percentage
//! - each participant's tip share and total share

use rust_decimal::Decimal;
use tracing::{debug, info};

use platter_shared::SplitConfig;
use platter_shared::types::{MINOR_UNIT_PLACES, round_money};

use super::allocation::ClaimAllocator;
use super::error::SplitError;
use super::types::{AllocatedItem, ParticipantShare, SplitRequest, SplitResult};
use super::validation::validate_request;
use crate::order::{Order, OrderService};

/// Stateless bill split calculator.
pub struct SplitService;

impl SplitService {
    /// Splits an order's bill among the requested participants.
    ///
    /// # Errors
    ///
    /// - `SplitError::Order` if the order is cancelled
    /// - `SplitError::Validation` if the request is malformed
    ///
    /// No result is produced on error.
    pub fn compute(
        order: &Order,
        request: &SplitRequest,
        config: &SplitConfig,
    ) -> Result<SplitResult, SplitError> {
        OrderService::ensure_splittable(order)?;
        let claims = validate_request(order, request, config)?;

        let quantities: Vec<u64> = order
            .items
            .iter()
            .map(|item| u64::from(item.quantity))
            .collect();
        let units = ClaimAllocator::allocate(&quantities, &claims);

        // Authoritative subtotal, independent of the participant shares.
        // Prices carry at most two decimals, so rescaling only pins the scale.
        let mut total_before_tip = order.total()?.amount;
        total_before_tip.rescale(MINOR_UNIT_PLACES);
        let tip_amount = Self::resolve_tip(total_before_tip, request);
        let total_after_tip = total_before_tip
            .checked_add(tip_amount)
            .ok_or_else(|| Self::tip_out_of_range(request))?;

        let participants = request
            .participants
            .iter()
            .zip(&units)
            .map(|(participant, allocation)| {
                let mut raw_share = Decimal::ZERO;
                let mut items = Vec::with_capacity(allocation.len());
                for (&item_index, &quantity) in allocation {
                    let item = &order.items[item_index];
                    raw_share += item.unit_price * Decimal::from(quantity);
                    items.push(AllocatedItem {
                        id: item.id,
                        // Never exceeds the item's own u32 quantity.
                        quantity: u32::try_from(quantity).unwrap_or(item.quantity),
                    });
                }

                let share_before_tip = round_money(raw_share);
                let share_tip = Self::tip_share(tip_amount, share_before_tip, total_before_tip);
                let share_total = share_before_tip
                    .checked_add(share_tip)
                    .ok_or_else(|| Self::tip_out_of_range(request))?;
                Ok(ParticipantShare {
                    name: participant.name.trim().to_string(),
                    items,
                    share_before_tip,
                    share_tip,
                    share_total: round_money(share_total),
                    paid: false,
                })
            })
            .collect::<Result<Vec<_>, SplitError>>()?;

        debug!(
            order_id = %order.id,
            shares = ?participants.iter().map(|p| p.share_total).collect::<Vec<_>>(),
            "Computed participant shares"
        );
        info!(
            order_id = %order.id,
            participants = participants.len(),
            total_before_tip = %total_before_tip,
            tip_amount = %tip_amount,
            "Bill split computed"
        );

        Ok(SplitResult {
            total_before_tip,
            tip_amount,
            total_after_tip,
            participants,
        })
    }

    /// A positive explicit amount wins, then the percentage of the subtotal,
    /// else zero. A zero amount falls through to the percentage.
    #[must_use]
    pub fn resolve_tip(total_before_tip: Decimal, request: &SplitRequest) -> Decimal {
        match (Self::explicit_tip(request), request.tip_percent) {
            (Some(amount), _) => round_money(amount),
            (None, Some(percent)) => {
                round_money(total_before_tip * (percent / Decimal::ONE_HUNDRED))
            }
            (None, None) => round_money(Decimal::ZERO),
        }
    }

    fn explicit_tip(request: &SplitRequest) -> Option<Decimal> {
        request.tip_amount.filter(|amount| *amount > Decimal::ZERO)
    }

    fn tip_out_of_range(request: &SplitRequest) -> SplitError {
        let field = if Self::explicit_tip(request).is_some() {
            "tip_amount"
        } else {
            "tip_percent"
        };
        SplitError::validation(field, "Tip pushes the bill total out of range")
    }

    /// A participant's proportional slice of the tip.
    #[must_use]
    pub fn tip_share(tip_amount: Decimal, share_before_tip: Decimal, total_before_tip: Decimal) -> Decimal {
        if total_before_tip > Decimal::ZERO {
            round_money(tip_amount * (share_before_tip / total_before_tip))
        } else {
            round_money(Decimal::ZERO)
        }
    }
}
