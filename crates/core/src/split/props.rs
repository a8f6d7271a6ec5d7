//! Property-based tests for bill splitting.
//!
//! - Conservation of the subtotal and the grand total
//! - Tip proportionality
//! - No over-allocation of any line item
//! - Fallback coverage of unclaimed items
//! - Idempotence under re-submission

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use platter_shared::SplitConfig;
use platter_shared::types::{Currency, OrderId, OrderItemId};

use super::book::SplitBook;
use super::service::SplitService;
use super::types::{ItemClaim, ParticipantInput, SplitRequest};
use crate::order::{Order, OrderItem, OrderStatus};

/// Strategy for a list of (unit price, quantity) lines, prices 0.00 to 250.00.
fn lines() -> impl Strategy<Value = Vec<(Decimal, u32)>> {
    prop::collection::vec(
        ((0i64..25_000i64).prop_map(|cents| Decimal::new(cents, 2)), 1u32..6),
        1..6,
    )
}

/// Strategy for raw claims: (line selector, explicit quantity or whole item).
fn raw_participants() -> impl Strategy<Value = Vec<Vec<(usize, Option<i64>)>>> {
    prop::collection::vec(
        prop::collection::vec((0usize..16, prop::option::of(1i64..8)), 1..4),
        1..5,
    )
}

/// Strategy for a tip given as amount, percentage, or not at all.
fn tip() -> impl Strategy<Value = (Option<Decimal>, Option<Decimal>)> {
    prop_oneof![
        Just((None, None)),
        (0i64..5_000i64).prop_map(|cents| (Some(Decimal::new(cents, 2)), None)),
        (0i64..=10_000i64).prop_map(|bp| (None, Some(Decimal::new(bp, 2)))),
    ]
}

fn build_order(lines: &[(Decimal, u32)]) -> Order {
    Order {
        id: OrderId::new(),
        status: OrderStatus::Delivered,
        currency: Currency::Usd,
        items: lines
            .iter()
            .map(|(unit_price, quantity)| OrderItem {
                id: OrderItemId::new(),
                name: "Dish".to_string(),
                unit_price: *unit_price,
                quantity: *quantity,
            })
            .collect(),
        notes: None,
        placed_at: Utc::now(),
    }
}

fn build_request(
    order: &Order,
    raw: &[Vec<(usize, Option<i64>)>],
    (tip_amount, tip_percent): (Option<Decimal>, Option<Decimal>),
) -> SplitRequest {
    SplitRequest {
        participants: raw
            .iter()
            .enumerate()
            .map(|(i, claims)| ParticipantInput {
                name: format!("Guest {i}"),
                items: claims
                    .iter()
                    .map(|(selector, quantity)| {
                        let id = order.items[selector % order.items.len()].id;
                        match quantity {
                            Some(quantity) => ItemClaim::Partial {
                                id,
                                quantity: *quantity,
                            },
                            None => ItemClaim::Whole(id),
                        }
                    })
                    .collect(),
            })
            .collect(),
        tip_percent,
        tip_amount,
    }
}

/// Rounding tolerance for `n` participants.
fn tolerance(participants: usize) -> Decimal {
    Decimal::new(i64::try_from(participants.saturating_sub(1)).unwrap_or(i64::MAX), 2)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Before-tip shares add up to the subtotal, and share totals to the
    /// grand total, within one cent per extra participant.
    #[test]
    fn prop_conservation(lines in lines(), raw in raw_participants(), tip in tip()) {
        let order = build_order(&lines);
        let request = build_request(&order, &raw, tip);
        let result = SplitService::compute(&order, &request, &SplitConfig::default()).unwrap();

        let before: Decimal = result.participants.iter().map(|p| p.share_before_tip).sum();
        let total: Decimal = result.participants.iter().map(|p| p.share_total).sum();
        let tolerance = tolerance(result.participants.len());

        prop_assert!((before - result.total_before_tip).abs() <= tolerance);
        prop_assert!(
            (total - result.total_after_tip).abs() <= tolerance,
            "sum of shares {} vs total {}", total, result.total_after_tip
        );
        prop_assert_eq!(result.total_after_tip, result.total_before_tip + result.tip_amount);
    }

    /// Each tip share is the participant's proportion of the tip, to the cent.
    #[test]
    fn prop_tip_proportional(lines in lines(), raw in raw_participants(), tip in tip()) {
        let order = build_order(&lines);
        let request = build_request(&order, &raw, tip);
        let result = SplitService::compute(&order, &request, &SplitConfig::default()).unwrap();

        for participant in &result.participants {
            if result.total_before_tip.is_zero() {
                prop_assert!(participant.share_tip.is_zero());
            } else {
                let exact = result.tip_amount * participant.share_before_tip / result.total_before_tip;
                // Half a cent of rounding plus division noise.
                prop_assert!((participant.share_tip - exact).abs() <= Decimal::new(51, 4));
            }
        }
    }

    /// Allocated units per line sum to exactly the line quantity.
    #[test]
    fn prop_no_over_allocation(lines in lines(), raw in raw_participants()) {
        let order = build_order(&lines);
        let request = build_request(&order, &raw, (None, None));
        let result = SplitService::compute(&order, &request, &SplitConfig::default()).unwrap();

        for item in &order.items {
            let allocated: u32 = result
                .participants
                .iter()
                .flat_map(|p| p.items.iter())
                .filter(|a| a.id == item.id)
                .map(|a| a.quantity)
                .sum();
            prop_assert_eq!(allocated, item.quantity);
        }
    }

    /// A line nobody claims is billed in full to participant 0.
    #[test]
    fn prop_unclaimed_line_billed_to_first(
        lines in lines(),
        raw in raw_participants(),
        price_cents in 1i64..10_000,
        quantity in 1u32..5,
    ) {
        let mut order = build_order(&lines);
        let request = build_request(&order, &raw, (None, None));
        let baseline = SplitService::compute(&order, &request, &SplitConfig::default()).unwrap();

        // Add a line after the claims were built, so nobody can have claimed it.
        let extra = OrderItem {
            id: OrderItemId::new(),
            name: "Extra".to_string(),
            unit_price: Decimal::new(price_cents, 2),
            quantity,
        };
        let extra_cost = extra.line_total().unwrap();
        order.items.push(extra);
        let result = SplitService::compute(&order, &request, &SplitConfig::default()).unwrap();

        prop_assert_eq!(
            result.participants[0].share_before_tip,
            baseline.participants[0].share_before_tip + extra_cost
        );
        for (now, before) in result.participants.iter().zip(&baseline.participants).skip(1) {
            prop_assert_eq!(now.share_before_tip, before.share_before_tip);
        }
    }

    /// Submitting the same request twice stores one split with the same shares.
    #[test]
    fn prop_resubmission_idempotent(lines in lines(), raw in raw_participants(), tip in tip()) {
        let order = build_order(&lines);
        let request = build_request(&order, &raw, tip);
        let book = SplitBook::new();

        let first = book.recompute(&order, &request, &SplitConfig::default()).unwrap();
        let second = book.recompute(&order, &request, &SplitConfig::default()).unwrap();

        prop_assert_eq!(book.len(), 1);
        prop_assert_eq!(first.participants, second.participants);
        prop_assert_eq!(first.total_after_tip, second.total_after_tip);
    }
}
