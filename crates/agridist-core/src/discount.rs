//! # Discount Normalization
//!
//! Turns the raw order lines supplied by a caller into canonical per-line and
//! aggregate discount figures, plus the order's discount approval state.
//!
//! ## Per-Line Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input line: { price, discount_pct?, discounted_price? }                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. base = price (missing input deserializes to 0)                      │
//! │  2. pct absent, discounted present, base > 0                            │
//! │       → pct = (base − discounted) / base × 100                         │
//! │  3. pct still absent → 0                                               │
//! │  4. clamp pct into [0, 30] (silently, never reject)                    │
//! │  5. discounted absent → base − base × pct / 100                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Output line: both discount fields ALWAYS populated                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No rounding anywhere — exact floating-point results are stored; rounding
//! is a presentation concern. The same normalization runs on create and on
//! update (full replacement line list, no deltas).

use crate::types::{DiscountStatus, OrderLine};
use crate::{DISCOUNT_EPSILON, MAX_DISCOUNT_PCT};

// =============================================================================
// Normalized Output
// =============================================================================

/// The result of normalizing an order's lines.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotals {
    /// The input lines with both discount fields populated.
    pub lines: Vec<OrderLine>,
    /// Sum of line bases.
    pub total_price: f64,
    /// Sum of line discounted prices. Always <= `total_price` for valid
    /// input.
    pub discounted_total: f64,
    /// Aggregate discount percentage; 0 when `total_price` is 0.
    pub discount_pct: f64,
    /// Derived approval state, see [`normalize_order`].
    pub discount_status: DiscountStatus,
}

// =============================================================================
// Normalization
// =============================================================================

/// Clamps a discount percentage into the allowed closed interval.
fn clamp_pct(pct: f64) -> f64 {
    pct.clamp(0.0, MAX_DISCOUNT_PCT)
}

/// Normalizes a single line: derives the missing discount figure and clamps
/// the percentage. Both discount fields are populated on return.
pub fn normalize_line(mut line: OrderLine) -> OrderLine {
    let base = line.price;

    let pct = match line.discount_pct {
        Some(p) => p,
        None => match line.discounted_price {
            Some(discounted) if base > 0.0 => (base - discounted) / base * 100.0,
            _ => 0.0,
        },
    };
    let pct = clamp_pct(pct);

    let discounted = line
        .discounted_price
        .unwrap_or_else(|| base - base * pct / 100.0);

    line.discount_pct = Some(pct);
    line.discounted_price = Some(discounted);
    line
}

/// True when the line carries a real discount (base minus discounted price
/// exceeds the epsilon).
pub fn is_discounted(line: &OrderLine) -> bool {
    let discounted = line.discounted_price.unwrap_or(line.price);
    line.price - discounted > DISCOUNT_EPSILON
}

/// Normalizes a full order.
///
/// `requested_status` is what the caller asked for, if anything. The policy:
/// - no line is actually discounted → `approved`, regardless of the request
///   (a zero-discount order can never sit pending approval);
/// - some line is discounted and the caller explicitly requested `approved`
///   → `approved`;
/// - otherwise → `pending`.
///
/// Idempotent: feeding a normalized order's own figures back in yields the
/// same figures (within epsilon).
pub fn normalize_order(
    lines: Vec<OrderLine>,
    requested_status: Option<DiscountStatus>,
) -> OrderTotals {
    let lines: Vec<OrderLine> = lines.into_iter().map(normalize_line).collect();

    let total_price: f64 = lines.iter().map(|l| l.price).sum();
    let discounted_total: f64 = lines
        .iter()
        .map(|l| l.discounted_price.unwrap_or(l.price))
        .sum();

    let discount_pct = if total_price > 0.0 {
        (total_price - discounted_total) / total_price * 100.0
    } else {
        0.0
    };

    let any_discounted = lines.iter().any(is_discounted);
    let discount_status = if !any_discounted {
        DiscountStatus::Approved
    } else if requested_status == Some(DiscountStatus::Approved) {
        DiscountStatus::Approved
    } else {
        DiscountStatus::Pending
    };

    OrderTotals {
        lines,
        total_price,
        discounted_total,
        discount_pct,
        discount_status,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: f64, pct: Option<f64>, discounted: Option<f64>) -> OrderLine {
        OrderLine {
            product_id: "p-1".to_string(),
            quantity: 1,
            price,
            product_name: None,
            discount_pct: pct,
            discounted_price: discounted,
        }
    }

    #[test]
    fn test_percentage_only_derives_discounted_price() {
        // 8500 at 10% → 7650
        let n = normalize_line(line(8500.0, Some(10.0), None));
        assert_eq!(n.discount_pct, Some(10.0));
        assert_eq!(n.discounted_price, Some(7650.0));
    }

    #[test]
    fn test_discounted_price_only_derives_percentage() {
        let n = normalize_line(line(8500.0, None, Some(7650.0)));
        let pct = n.discount_pct.unwrap();
        assert!((pct - 10.0).abs() < 1e-9);
        assert_eq!(n.discounted_price, Some(7650.0));
    }

    #[test]
    fn test_no_discount_fields_defaults_to_zero() {
        let n = normalize_line(line(1000.0, None, None));
        assert_eq!(n.discount_pct, Some(0.0));
        assert_eq!(n.discounted_price, Some(1000.0));
        assert!(!is_discounted(&n));
    }

    #[test]
    fn test_out_of_range_percentage_is_clamped_not_rejected() {
        let n = normalize_line(line(1000.0, Some(40.0), None));
        assert_eq!(n.discount_pct, Some(30.0));
        assert_eq!(n.discounted_price, Some(700.0));

        let n = normalize_line(line(1000.0, Some(-5.0), None));
        assert_eq!(n.discount_pct, Some(0.0));
        assert_eq!(n.discounted_price, Some(1000.0));
    }

    #[test]
    fn test_clamped_percentage_stays_in_interval() {
        for p in [-100.0, 0.0, 12.5, 30.0, 30.000001, 99.0] {
            let n = normalize_line(line(500.0, Some(p), None));
            let pct = n.discount_pct.unwrap();
            assert!((0.0..=MAX_DISCOUNT_PCT).contains(&pct), "pct {pct} escaped");
        }
    }

    #[test]
    fn test_zero_base_with_discounted_price() {
        // base 0 → cannot derive a percentage, defaults to 0
        let n = normalize_line(line(0.0, None, Some(0.0)));
        assert_eq!(n.discount_pct, Some(0.0));
        assert!(!is_discounted(&n));
    }

    #[test]
    fn test_renormalization_is_idempotent() {
        let first = normalize_line(line(8500.0, Some(10.0), None));
        let second = normalize_line(first.clone());
        let d1 = first.discounted_price.unwrap();
        let d2 = second.discounted_price.unwrap();
        let p1 = first.discount_pct.unwrap();
        let p2 = second.discount_pct.unwrap();
        assert!((d1 - d2).abs() < DISCOUNT_EPSILON);
        assert!((p1 - p2).abs() < DISCOUNT_EPSILON);
    }

    #[test]
    fn test_epsilon_guards_float_noise() {
        // A 0% round trip can produce a discounted price a hair below base;
        // that must not count as a discount.
        let mut l = line(0.1 + 0.2, None, None);
        l.discounted_price = Some(0.3);
        let n = normalize_line(l);
        assert!(!is_discounted(&n));
    }

    #[test]
    fn test_aggregate_totals() {
        let totals = normalize_order(
            vec![
                line(8500.0, Some(10.0), None),
                line(1000.0, None, None),
            ],
            None,
        );
        assert_eq!(totals.total_price, 9500.0);
        assert_eq!(totals.discounted_total, 8650.0);
        assert!((totals.discount_pct - (850.0 / 9500.0 * 100.0)).abs() < 1e-9);
        assert!(totals.discounted_total <= totals.total_price);
        assert_eq!(totals.discount_status, DiscountStatus::Pending);
    }

    #[test]
    fn test_empty_order_has_zero_aggregate() {
        let totals = normalize_order(vec![], None);
        assert_eq!(totals.total_price, 0.0);
        assert_eq!(totals.discount_pct, 0.0);
        assert_eq!(totals.discount_status, DiscountStatus::Approved);
    }

    #[test]
    fn test_undiscounted_order_is_forced_approved() {
        // single line {price: 1000}, no discount fields
        let totals = normalize_order(vec![line(1000.0, None, None)], Some(DiscountStatus::Pending));
        assert_eq!(totals.discount_status, DiscountStatus::Approved);
        assert_eq!(totals.lines[0].discount_pct, Some(0.0));
        assert_eq!(totals.lines[0].discounted_price, Some(1000.0));
    }

    #[test]
    fn test_discounted_order_defaults_to_pending() {
        // single line {price: 8500, discount_pct: 10}
        let totals = normalize_order(vec![line(8500.0, Some(10.0), None)], None);
        assert_eq!(totals.total_price, 8500.0);
        assert_eq!(totals.discounted_total, 7650.0);
        assert!((totals.discount_pct - 10.0).abs() < 1e-9);
        assert_eq!(totals.discount_status, DiscountStatus::Pending);
    }

    #[test]
    fn test_explicitly_requested_approval_is_honored() {
        let totals = normalize_order(
            vec![line(8500.0, Some(10.0), None)],
            Some(DiscountStatus::Approved),
        );
        assert_eq!(totals.discount_status, DiscountStatus::Approved);
    }
}
