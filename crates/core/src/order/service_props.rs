//! Property-based tests for the order status workflow.

use proptest::prelude::*;

use super::error::OrderError;
use super::service::OrderService;
use super::types::OrderStatus;

fn status_strategy() -> impl Strategy<Value = OrderStatus> {
    prop::sample::select(OrderStatus::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Terminal statuses never transition anywhere.
    #[test]
    fn prop_terminal_statuses_are_final(to in status_strategy()) {
        for from in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            let is_invalid = matches!(
                OrderService::transition(from, to),
                Err(OrderError::InvalidTransition { .. })
            );
            prop_assert!(is_invalid);
        }
    }

    /// `transition` agrees with `is_valid_transition` for every pair.
    #[test]
    fn prop_transition_matches_table(from in status_strategy(), to in status_strategy()) {
        let valid = OrderService::is_valid_transition(from, to);
        match OrderService::transition(from, to) {
            Ok(next) => {
                prop_assert!(valid);
                prop_assert_eq!(next, to);
            }
            Err(_) => prop_assert!(!valid),
        }
    }

    /// Every non-terminal status can be cancelled, and nothing transitions to itself.
    #[test]
    fn prop_cancel_from_any_open_status(from in status_strategy()) {
        prop_assert_eq!(
            OrderService::is_valid_transition(from, OrderStatus::Cancelled),
            !from.is_terminal()
        );
        prop_assert!(!OrderService::is_valid_transition(from, from));
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// The kitchen can never move an order backwards.
    #[test]
    fn test_no_backwards_transitions() {
        assert!(!OrderService::is_valid_transition(OrderStatus::Ready, OrderStatus::Preparing));
        assert!(!OrderService::is_valid_transition(OrderStatus::Preparing, OrderStatus::Pending));
        assert!(!OrderService::is_valid_transition(OrderStatus::Delivered, OrderStatus::Ready));
    }
}
