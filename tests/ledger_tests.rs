//! Stock-ledger arithmetic tests
//!
//! Properties of the movement ledger over integer quantities:
//! - ledger-sum consistency (quantity == initial + Σ inbound − Σ outbound)
//! - withdrawal guard (stock never goes negative)
//! - valuation aggregation

use proptest::prelude::*;

/// Apply one movement to a stock level, refusing overdrafts.
fn apply_movement(quantity: i64, inbound: bool, amount: i64) -> Result<i64, &'static str> {
    if amount <= 0 {
        return Err("amount must be positive");
    }
    if inbound {
        Ok(quantity + amount)
    } else if quantity >= amount {
        Ok(quantity - amount)
    } else {
        Err("insufficient stock")
    }
}

/// Total value of a catalog of (quantity, unit_price) pairs.
fn total_value(products: &[(i64, f64)]) -> f64 {
    products
        .iter()
        .map(|(quantity, unit_price)| *quantity as f64 * unit_price)
        .sum()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn inbound_adds_stock() {
        assert_eq!(apply_movement(500, true, 50), Ok(550));
    }

    #[test]
    fn outbound_removes_stock() {
        assert_eq!(apply_movement(500, false, 120), Ok(380));
    }

    #[test]
    fn overdraft_is_refused() {
        assert!(apply_movement(500, false, 501).is_err());
    }

    #[test]
    fn full_withdrawal_reaches_exactly_zero() {
        assert_eq!(apply_movement(500, false, 500), Ok(0));
    }

    #[test]
    fn non_positive_amounts_are_refused() {
        assert!(apply_movement(500, true, 0).is_err());
        assert!(apply_movement(500, false, -10).is_err());
    }

    #[test]
    fn empty_catalog_is_worth_zero() {
        assert_eq!(total_value(&[]), 0.0);
    }

    #[test]
    fn valuation_sums_quantity_times_price() {
        // 500 × 28.90 + 200 × 85.00
        let catalog = [(500, 28.90), (200, 85.00)];
        assert!((total_value(&catalog) - 31450.00).abs() < 1e-6);
    }

    #[test]
    fn low_stock_threshold_is_inclusive() {
        let quantity = 10;
        let min_stock = 10;
        assert!(quantity <= min_stock);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn amount_strategy() -> impl Strategy<Value = i64> {
        1i64..=1000
    }

    fn movement_strategy() -> impl Strategy<Value = (bool, i64)> {
        (any::<bool>(), amount_strategy())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Stock never goes negative, whatever sequence of movements is
        /// attempted.
        #[test]
        fn stock_never_negative(
            initial in 0i64..=1000,
            movements in prop::collection::vec(movement_strategy(), 0..32)
        ) {
            let mut quantity = initial;
            for (inbound, amount) in movements {
                if let Ok(next) = apply_movement(quantity, inbound, amount) {
                    quantity = next;
                }
            }
            prop_assert!(quantity >= 0);
        }

        /// The accepted movements account exactly for the difference between
        /// the final and the initial stock.
        #[test]
        fn accepted_movements_sum_to_quantity_delta(
            initial in 0i64..=1000,
            movements in prop::collection::vec(movement_strategy(), 0..32)
        ) {
            let mut quantity = initial;
            let mut total_in = 0i64;
            let mut total_out = 0i64;

            for (inbound, amount) in movements {
                if let Ok(next) = apply_movement(quantity, inbound, amount) {
                    quantity = next;
                    if inbound {
                        total_in += amount;
                    } else {
                        total_out += amount;
                    }
                }
            }

            prop_assert_eq!(quantity, initial + total_in - total_out);
        }

        /// A refused withdrawal leaves the stock level untouched.
        #[test]
        fn refused_withdrawal_changes_nothing(
            initial in 0i64..=100,
            extra in 1i64..=100
        ) {
            let result = apply_movement(initial, false, initial + extra);
            prop_assert!(result.is_err());
        }

        /// Withdrawing everything empties the stock.
        #[test]
        fn full_withdrawal_empties_stock(initial in 1i64..=1000) {
            prop_assert_eq!(apply_movement(initial, false, initial), Ok(0));
        }

        /// Valuation is non-negative for non-negative catalogs.
        #[test]
        fn valuation_non_negative(
            products in prop::collection::vec((0i64..=1000, 0.0f64..=1000.0), 0..16)
        ) {
            prop_assert!(total_value(&products) >= 0.0);
        }
    }
}
