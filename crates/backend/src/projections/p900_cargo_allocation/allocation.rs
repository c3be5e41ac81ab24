use contracts::enums::CargoRounding;
use serde_json::Value;
use std::collections::HashMap;

use crate::domain::a001_marketplace_order::{LineId, LineView, MarketplaceOrder};

/// Cargo share per identified line of one order
pub type AllocatedCost = HashMap<LineId, f64>;

/// Распределение стоимости доставки заказа по строкам пропорционально сумме продажи
pub fn allocate_order_cargo(order: &MarketplaceOrder, rounding: CargoRounding) -> AllocatedCost {
    allocate_cargo(order.cargo_total, &order.lines, rounding)
}

/// Distribute an order-level cargo charge across its lines.
///
/// Weight of a line is its resolved sale amount (never negative). With zero
/// total weight the charge is split equally. Lines without an identity still
/// take part in the split but are left out of the result, so a missing key
/// means "unknown", not "zero". Non-object entries are ignored entirely.
pub fn allocate_cargo(cargo_total: f64, lines: &[Value], rounding: CargoRounding) -> AllocatedCost {
    let mut allocated = AllocatedCost::new();
    if cargo_total == 0.0 || !cargo_total.is_finite() {
        return allocated;
    }

    let weighted: Vec<(Option<LineId>, f64)> = lines
        .iter()
        .filter_map(LineView::new)
        .map(|line| (line.id(), line.sale_price().max(0.0)))
        .collect();
    if weighted.is_empty() {
        return allocated;
    }

    let weights: Vec<f64> = weighted.iter().map(|(_, w)| *w).collect();
    let shares = match rounding {
        CargoRounding::Exact => exact_shares(cargo_total, &weights),
        CargoRounding::LargestRemainder => largest_remainder_shares(cargo_total, &weights),
    };

    // duplicate ids: the later line wins
    for ((id, _), share) in weighted.into_iter().zip(shares) {
        if let Some(id) = id {
            if let Some(previous) = allocated.insert(id.clone(), share) {
                tracing::warn!(
                    "Cargo allocation: duplicate line id {}, share {:.2} replaced by {:.2}",
                    id,
                    previous,
                    share
                );
            }
        }
    }
    allocated
}

fn exact_shares(total: f64, weights: &[f64]) -> Vec<f64> {
    let total_weight: f64 = weights.iter().sum();
    if total_weight <= 0.0 {
        let per_line = total / weights.len() as f64;
        return vec![per_line; weights.len()];
    }
    weights.iter().map(|w| total * (w / total_weight)).collect()
}

/// Shares in whole cents that add up to `total` rounded to cents.
///
/// Every share is floored first; the leftover cents go one each to the
/// largest fractional remainders (ties: larger weight, then input order).
fn largest_remainder_shares(total: f64, weights: &[f64]) -> Vec<f64> {
    let sign = if total < 0.0 { -1.0 } else { 1.0 };
    let total_cents = (total.abs() * 100.0).round() as i128;
    let total_weight: f64 = weights.iter().sum();

    let exact: Vec<f64> = if total_weight <= 0.0 {
        vec![total_cents as f64 / weights.len() as f64; weights.len()]
    } else {
        weights
            .iter()
            .map(|w| total_cents as f64 * w / total_weight)
            .collect()
    };

    // casts and sums saturate, so absurd totals degrade instead of overflowing
    let mut cents: Vec<i128> = exact.iter().map(|e| e.floor() as i128).collect();
    let floored = cents.iter().fold(0i128, |acc, c| acc.saturating_add(*c));
    let leftover = total_cents.saturating_sub(floored);

    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| {
        let rem_a = exact[a] - exact[a].floor();
        let rem_b = exact[b] - exact[b].floor();
        rem_b
            .total_cmp(&rem_a)
            .then(weights[b].total_cmp(&weights[a]))
            .then(a.cmp(&b))
    });
    let leftover = usize::try_from(leftover.max(0)).unwrap_or(usize::MAX);
    for &idx in order.iter().take(leftover) {
        cents[idx] = cents[idx].saturating_add(1);
    }

    cents
        .into_iter()
        .map(|c| sign * c as f64 / 100.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lines(value: Value) -> Vec<Value> {
        value.as_array().cloned().unwrap_or_default()
    }

    fn cents(value: f64) -> i64 {
        (value * 100.0).round() as i64
    }

    #[test]
    fn test_proportional_allocation_sums_to_total() {
        let l = lines(json!([
            { "id": 1, "price": 300 },
            { "id": 2, "price": 700 }
        ]));
        let allocated = allocate_cargo(100.0, &l, CargoRounding::Exact);
        assert_eq!(allocated.len(), 2);
        assert!((allocated[&LineId::Int(1)] - 30.0).abs() < 1e-6);
        assert!((allocated[&LineId::Int(2)] - 70.0).abs() < 1e-6);
        let sum: f64 = allocated.values().sum();
        assert!((sum - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_weights_split_equally() {
        let l = lines(json!([
            { "lineId": 1, "price": 0 },
            { "lineId": 2 },
            { "lineId": 3, "price": -5 }
        ]));
        let allocated = allocate_cargo(90.0, &l, CargoRounding::Exact);
        assert_eq!(allocated.len(), 3);
        for share in allocated.values() {
            assert!((share - 30.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_cargo_or_no_lines_is_empty() {
        let l = lines(json!([{ "id": 1, "price": 100 }]));
        assert!(allocate_cargo(0.0, &l, CargoRounding::Exact).is_empty());
        assert!(allocate_cargo(0.0, &l, CargoRounding::LargestRemainder).is_empty());
        assert!(allocate_cargo(50.0, &[], CargoRounding::Exact).is_empty());
        assert!(allocate_cargo(50.0, &lines(json!([1, "x"])), CargoRounding::Exact).is_empty());
    }

    #[test]
    fn test_missing_identity_excluded_but_weighted() {
        let l = lines(json!([
            { "id": 1, "price": 300 },
            { "price": 700 }
        ]));
        let allocated = allocate_cargo(100.0, &l, CargoRounding::Exact);
        assert_eq!(allocated.len(), 1);
        assert!(!allocated.values().any(|v| *v == 0.0));
        assert!((allocated[&LineId::Int(1)] - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_non_object_lines_do_not_dilute_equal_split() {
        let l = lines(json!([{ "id": "a" }, null, { "id": "b" }]));
        let allocated = allocate_cargo(10.0, &l, CargoRounding::Exact);
        assert_eq!(allocated[&LineId::Text("a".into())], 5.0);
        assert_eq!(allocated[&LineId::Text("b".into())], 5.0);
    }

    #[test]
    fn test_duplicate_identity_later_line_wins() {
        let l = lines(json!([
            { "id": 1, "price": 100 },
            { "id": 1, "price": 300 }
        ]));
        let allocated = allocate_cargo(40.0, &l, CargoRounding::Exact);
        assert_eq!(allocated.len(), 1);
        assert!((allocated[&LineId::Int(1)] - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_allocation_is_deterministic() {
        let l = lines(json!([
            { "id": 1, "price": 13.37 },
            { "id": 2, "price": 2.5 },
            { "id": 3, "unitPrice": 4, "quantity": 2 }
        ]));
        let first = allocate_cargo(29.9, &l, CargoRounding::Exact);
        let second = allocate_cargo(29.9, &l, CargoRounding::Exact);
        assert_eq!(first, second);
    }

    #[test]
    fn test_largest_remainder_sums_exactly_to_cents() {
        let l = lines(json!([
            { "id": 1, "price": 10 },
            { "id": 2, "price": 10 },
            { "id": 3, "price": 10 }
        ]));
        let allocated = allocate_cargo(100.0, &l, CargoRounding::LargestRemainder);
        assert_eq!(cents(allocated[&LineId::Int(1)]), 3334);
        assert_eq!(cents(allocated[&LineId::Int(2)]), 3333);
        assert_eq!(cents(allocated[&LineId::Int(3)]), 3333);
        let total: i64 = allocated.values().map(|v| cents(*v)).sum();
        assert_eq!(total, 10000);
    }

    #[test]
    fn test_largest_remainder_prefers_largest_fraction() {
        // exact cents: 714.28.., 285.71..
        let l = lines(json!([
            { "id": 1, "price": 500 },
            { "id": 2, "price": 200 }
        ]));
        let allocated = allocate_cargo(10.0, &l, CargoRounding::LargestRemainder);
        assert_eq!(cents(allocated[&LineId::Int(1)]), 714);
        assert_eq!(cents(allocated[&LineId::Int(2)]), 286);
    }

    #[test]
    fn test_largest_remainder_negative_total() {
        let l = lines(json!([{ "id": 1 }, { "id": 2 }, { "id": 3 }]));
        let allocated = allocate_cargo(-1.0, &l, CargoRounding::LargestRemainder);
        let total: i64 = allocated.values().map(|v| cents(*v)).sum();
        assert_eq!(total, -100);
        assert_eq!(cents(allocated[&LineId::Int(1)]), -34);
    }

    #[test]
    fn test_largest_remainder_extreme_total_stays_finite() {
        let l = lines(json!([{ "id": 1, "price": 1 }, { "id": 2, "price": 2 }, { "id": 3 }]));
        let allocated = allocate_cargo(1e300, &l, CargoRounding::LargestRemainder);
        assert_eq!(allocated.len(), 3);
        assert!(allocated.values().all(|v| v.is_finite() && *v >= 0.0));
    }
}
