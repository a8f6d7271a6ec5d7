//! Order service for placement, kitchen status transitions and order views.
//!
//! This module implements the order state machine. All methods are
//! associated functions operating on snapshots; persisting the result is
//! the caller's job.

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info};

use platter_shared::types::{MINOR_UNIT_PLACES, OrderId, OrderItemId};

use crate::order::error::{MAX_NOTES_LENGTH, OrderError};
use crate::order::types::{Order, OrderItem, OrderStatus, PlaceOrderInput};

/// Stateless service for managing orders.
pub struct OrderService;

impl OrderService {
    /// Places a new order from the requested line items.
    ///
    /// # Returns
    /// * `Ok(Order)` in `Pending` status with freshly assigned ids
    /// * `Err(OrderError)` naming the first invalid field
    pub fn place(input: PlaceOrderInput) -> Result<Order, OrderError> {
        if input.items.is_empty() {
            return Err(OrderError::NoItems);
        }
        if input
            .notes
            .as_ref()
            .is_some_and(|notes| notes.chars().count() > MAX_NOTES_LENGTH)
        {
            return Err(OrderError::NotesTooLong);
        }

        let mut items = Vec::with_capacity(input.items.len());
        for (index, item) in input.items.into_iter().enumerate() {
            let quantity = u32::try_from(item.quantity)
                .map_err(|_| OrderError::InvalidQuantity {
                    index,
                    quantity: item.quantity,
                })?;
            items.push(OrderItem {
                id: OrderItemId::new(),
                name: item.name,
                unit_price: item.unit_price,
                quantity,
            });
        }

        let order = Order {
            id: OrderId::new(),
            status: OrderStatus::Pending,
            currency: input.currency,
            items,
            notes: input.notes,
            placed_at: Utc::now(),
        };
        let total = Self::validate_items(&order)?;
        info!(order_id = %order.id, total = %total, "Order placed");
        Ok(order)
    }

    /// Checks every line item of an order snapshot and returns its subtotal.
    ///
    /// Each line needs a quantity of at least one and a non-negative unit
    /// price with at most two decimals, and the subtotal must fit in a
    /// decimal amount.
    pub fn validate_items(order: &Order) -> Result<Decimal, OrderError> {
        for (index, item) in order.items.iter().enumerate() {
            if item.quantity == 0 {
                return Err(OrderError::InvalidQuantity {
                    index,
                    quantity: 0,
                });
            }
            if item.unit_price < Decimal::ZERO
                || item.unit_price.normalize().scale() > MINOR_UNIT_PLACES
            {
                return Err(OrderError::InvalidPrice {
                    index,
                    price: item.unit_price,
                });
            }
        }
        Ok(order.total()?.amount)
    }

    /// Moves an order from `current` to `target`.
    ///
    /// # Returns
    /// * `Ok(target)` if the transition is allowed
    /// * `Err(OrderError::InvalidTransition)` otherwise
    pub fn transition(current: OrderStatus, target: OrderStatus) -> Result<OrderStatus, OrderError> {
        if Self::is_valid_transition(current, target) {
            debug!(from = %current, to = %target, "Order status transition");
            Ok(target)
        } else {
            Err(OrderError::InvalidTransition {
                from: current,
                to: target,
            })
        }
    }

    /// Applies a transition to an order in place.
    pub fn advance(order: &mut Order, target: OrderStatus) -> Result<(), OrderError> {
        order.status = Self::transition(order.status, target)?;
        info!(order_id = %order.id, status = %order.status, "Order status updated");
        Ok(())
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Preparing | Cancelled
    /// - Preparing → Ready | Cancelled
    /// - Ready → Delivered | Cancelled
    #[must_use]
    pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
        matches!(
            (from, to),
            (
                OrderStatus::Pending,
                OrderStatus::Preparing | OrderStatus::Cancelled
            ) | (
                OrderStatus::Preparing,
                OrderStatus::Ready | OrderStatus::Cancelled
            ) | (
                OrderStatus::Ready,
                OrderStatus::Delivered | OrderStatus::Cancelled
            )
        )
    }

    /// Fails if the order may not have its bill split.
    pub fn ensure_splittable(order: &Order) -> Result<(), OrderError> {
        if order.is_cancelled() {
            return Err(OrderError::Cancelled(order.id));
        }
        Ok(())
    }

    /// Orders the kitchen still has to work on, oldest first.
    #[must_use]
    pub fn kitchen_queue(orders: &[Order]) -> Vec<&Order> {
        let mut queue: Vec<&Order> = orders.iter().filter(|o| o.status.is_active()).collect();
        queue.sort_by_key(|o| o.placed_at);
        queue
    }

    /// Orders with the given status (all of them for `None`), newest first.
    #[must_use]
    pub fn filter_by_status(orders: &[Order], status: Option<OrderStatus>) -> Vec<&Order> {
        let mut matching: Vec<&Order> = orders
            .iter()
            .filter(|o| status.is_none_or(|s| o.status == s))
            .collect();
        matching.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));
        matching
    }

    /// Number of orders per status. Every status is present, even at zero.
    #[must_use]
    pub fn status_counts(orders: &[Order]) -> BTreeMap<OrderStatus, usize> {
        let mut counts: BTreeMap<OrderStatus, usize> =
            OrderStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for order in orders {
            *counts.entry(order.status).or_default() += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::types::NewOrderItem;
    use platter_shared::types::Currency;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn new_item(price: Decimal, quantity: i64) -> NewOrderItem {
        NewOrderItem {
            name: "Fuchka".to_string(),
            unit_price: price,
            quantity,
        }
    }

    fn input(items: Vec<NewOrderItem>) -> PlaceOrderInput {
        PlaceOrderInput {
            currency: Currency::Bdt,
            items,
            notes: None,
        }
    }

    #[test]
    fn test_place_order() {
        let order =
            OrderService::place(input(vec![new_item(dec!(120), 2), new_item(dec!(45.50), 1)]))
                .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.total().unwrap().amount, dec!(285.50));
        assert_ne!(order.items[0].id, order.items[1].id);
    }

    #[test]
    fn test_place_requires_items() {
        assert!(matches!(
            OrderService::place(input(vec![])),
            Err(OrderError::NoItems)
        ));
    }

    #[test]
    fn test_place_rejects_non_positive_quantity() {
        let result = OrderService::place(input(vec![new_item(dec!(10), 1), new_item(dec!(10), 0)]));
        assert!(matches!(
            result,
            Err(OrderError::InvalidQuantity {
                index: 1,
                quantity: 0
            })
        ));
        let result = OrderService::place(input(vec![new_item(dec!(10), -3)]));
        assert!(matches!(result, Err(OrderError::InvalidQuantity { .. })));
    }

    #[test]
    fn test_place_rejects_bad_price() {
        let result = OrderService::place(input(vec![new_item(dec!(-1), 1)]));
        assert!(matches!(result, Err(OrderError::InvalidPrice { index: 0, .. })));
        let result = OrderService::place(input(vec![new_item(dec!(1.005), 1)]));
        assert!(matches!(result, Err(OrderError::InvalidPrice { .. })));
        // Trailing zeros are not extra precision
        assert!(OrderService::place(input(vec![new_item(dec!(1.500), 1)])).is_ok());
    }

    #[test]
    fn test_place_rejects_overflowing_total() {
        let result = OrderService::place(input(vec![
            new_item(dec!(10), 1),
            new_item(Decimal::MAX, 2),
        ]));
        assert!(matches!(result, Err(OrderError::TotalOverflow { index: 1 })));
    }

    fn snapshot(items: Vec<OrderItem>) -> Order {
        Order {
            id: OrderId::new(),
            status: OrderStatus::Delivered,
            currency: Currency::Bdt,
            items,
            notes: None,
            placed_at: Utc::now(),
        }
    }

    fn line(unit_price: Decimal, quantity: u32) -> OrderItem {
        OrderItem {
            id: OrderItemId::new(),
            name: "Jhalmuri".to_string(),
            unit_price,
            quantity,
        }
    }

    #[rstest]
    #[case(line(dec!(-50.00), 2), "items[1].unit_price")]
    #[case(line(dec!(0.001), 1), "items[1].unit_price")]
    #[case(line(dec!(5), 0), "items[1].quantity")]
    #[case(line(Decimal::MAX, 1), "items[1]")]
    fn test_validate_items_rejects_bad_snapshot(#[case] bad: OrderItem, #[case] field: &str) {
        let order = snapshot(vec![line(dec!(10), 1), bad]);
        let err = OrderService::validate_items(&order).unwrap_err();
        assert_eq!(err.field().as_deref(), Some(field));
    }

    #[test]
    fn test_validate_items_returns_subtotal() {
        let order = snapshot(vec![line(dec!(0), 3), line(dec!(12.25), 2)]);
        assert_eq!(OrderService::validate_items(&order).unwrap(), dec!(24.50));
    }

    #[test]
    fn test_place_rejects_long_notes() {
        let mut request = input(vec![new_item(dec!(10), 1)]);
        request.notes = Some("x".repeat(MAX_NOTES_LENGTH + 1));
        assert!(matches!(
            OrderService::place(request),
            Err(OrderError::NotesTooLong)
        ));
    }

    #[test]
    fn test_happy_path_to_delivered() {
        let mut order = OrderService::place(input(vec![new_item(dec!(10), 1)])).unwrap();
        OrderService::advance(&mut order, OrderStatus::Preparing).unwrap();
        OrderService::advance(&mut order, OrderStatus::Ready).unwrap();
        OrderService::advance(&mut order, OrderStatus::Delivered).unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
    }

    #[test]
    fn test_cannot_skip_preparing() {
        let result = OrderService::transition(OrderStatus::Pending, OrderStatus::Ready);
        assert!(matches!(
            result,
            Err(OrderError::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Ready
            })
        ));
    }

    #[test]
    fn test_failed_advance_leaves_status() {
        let mut order = OrderService::place(input(vec![new_item(dec!(10), 1)])).unwrap();
        assert!(OrderService::advance(&mut order, OrderStatus::Delivered).is_err());
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_cancelled_order_not_splittable() {
        let mut order = OrderService::place(input(vec![new_item(dec!(10), 1)])).unwrap();
        assert!(OrderService::ensure_splittable(&order).is_ok());
        OrderService::advance(&mut order, OrderStatus::Cancelled).unwrap();
        assert!(matches!(
            OrderService::ensure_splittable(&order),
            Err(OrderError::Cancelled(id)) if id == order.id
        ));
    }

    fn placed(status: OrderStatus, minutes_ago: i64) -> Order {
        let mut order = snapshot(vec![line(dec!(10), 1)]);
        order.status = status;
        order.placed_at = Utc::now() - chrono::Duration::minutes(minutes_ago);
        order
    }

    #[test]
    fn test_kitchen_queue_oldest_active_first() {
        let orders = vec![
            placed(OrderStatus::Preparing, 5),
            placed(OrderStatus::Ready, 30),
            placed(OrderStatus::Pending, 20),
            placed(OrderStatus::Delivered, 60),
            placed(OrderStatus::Pending, 1),
        ];
        let queue = OrderService::kitchen_queue(&orders);
        let ids: Vec<OrderId> = queue.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![orders[2].id, orders[0].id, orders[4].id]);
    }

    #[test]
    fn test_filter_by_status_newest_first() {
        let orders = vec![
            placed(OrderStatus::Ready, 30),
            placed(OrderStatus::Pending, 20),
            placed(OrderStatus::Ready, 10),
        ];
        let ready = OrderService::filter_by_status(&orders, Some(OrderStatus::Ready));
        assert_eq!(
            ready.iter().map(|o| o.id).collect::<Vec<_>>(),
            vec![orders[2].id, orders[0].id]
        );

        let all = OrderService::filter_by_status(&orders, None);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, orders[2].id);
        assert!(OrderService::filter_by_status(&orders, Some(OrderStatus::Cancelled)).is_empty());
    }

    #[test]
    fn test_status_counts_include_empty_statuses() {
        let orders = vec![
            placed(OrderStatus::Pending, 3),
            placed(OrderStatus::Pending, 2),
            placed(OrderStatus::Ready, 1),
        ];
        let counts = OrderService::status_counts(&orders);
        assert_eq!(counts.len(), OrderStatus::ALL.len());
        assert_eq!(counts[&OrderStatus::Pending], 2);
        assert_eq!(counts[&OrderStatus::Ready], 1);
        assert_eq!(counts[&OrderStatus::Cancelled], 0);
    }
}
