use contracts::dashboards::d400_profit_summary::PeriodSummaryDto;
use contracts::projections::p901_profit_lines::ProfitLineDto;
use std::collections::HashMap;

use crate::domain::a001_marketplace_order::MarketplaceOrder;
use crate::projections::p900_cargo_allocation::allocate_order_cargo;
use crate::projections::p901_profit_lines::{
    calc_profit_for_line, profit_row, ProfitBreakdown, ReportSettings,
};
use crate::shared::fields::round2;

const MICROS_PER_UNIT: f64 = 1_000_000.0;

/// f64 → i128 casts saturate, non-finite values count as 0
fn to_micros(value: f64) -> i128 {
    if value.is_finite() {
        (value * MICROS_PER_UNIT).round() as i128
    } else {
        0
    }
}

fn from_micros(value: i128) -> f64 {
    round2(value as f64 / MICROS_PER_UNIT)
}

/// Period sums kept in integer micro-units, so the fold gives the same
/// result for any order of orders and lines.
///
/// Additions saturate at the i128 bounds; real amounts never get there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    pub order_count: u64,
    pub line_count: u64,
    pub costed_line_count: u64,
    pub sale: i128,
    pub commission: i128,
    pub cargo: i128,
    pub seller_discount: i128,
    pub marketplace_discount: i128,
    pub invoice_tax: i128,
    pub total_deductions: i128,
    pub net_profit: i128,
    pub product_cost: i128,
}

impl PeriodTotals {
    pub fn add_line(&mut self, p: &ProfitBreakdown) {
        self.line_count = self.line_count.saturating_add(1);
        self.sale = self.sale.saturating_add(to_micros(p.sale));
        self.commission = self.commission.saturating_add(to_micros(p.commission));
        self.cargo = self.cargo.saturating_add(to_micros(p.cargo));
        self.seller_discount = self
            .seller_discount
            .saturating_add(to_micros(p.seller_discount));
        self.marketplace_discount = self
            .marketplace_discount
            .saturating_add(to_micros(p.marketplace_discount));
        self.invoice_tax = self.invoice_tax.saturating_add(to_micros(p.invoice_tax));
        self.total_deductions = self
            .total_deductions
            .saturating_add(to_micros(p.total_deductions));
        self.net_profit = self.net_profit.saturating_add(to_micros(p.net_profit));
        if let Some(cost) = p.product_cost {
            self.costed_line_count = self.costed_line_count.saturating_add(1);
            self.product_cost = self.product_cost.saturating_add(to_micros(cost));
        }
    }

    pub fn merge(&mut self, other: &PeriodTotals) {
        self.order_count = self.order_count.saturating_add(other.order_count);
        self.line_count = self.line_count.saturating_add(other.line_count);
        self.costed_line_count = self
            .costed_line_count
            .saturating_add(other.costed_line_count);
        self.sale = self.sale.saturating_add(other.sale);
        self.commission = self.commission.saturating_add(other.commission);
        self.cargo = self.cargo.saturating_add(other.cargo);
        self.seller_discount = self.seller_discount.saturating_add(other.seller_discount);
        self.marketplace_discount = self
            .marketplace_discount
            .saturating_add(other.marketplace_discount);
        self.invoice_tax = self.invoice_tax.saturating_add(other.invoice_tax);
        self.total_deductions = self.total_deductions.saturating_add(other.total_deductions);
        self.net_profit = self.net_profit.saturating_add(other.net_profit);
        self.product_cost = self.product_cost.saturating_add(other.product_cost);
    }

    pub fn to_dto(&self) -> PeriodSummaryDto {
        PeriodSummaryDto {
            order_count: self.order_count,
            line_count: self.line_count,
            sale_total: from_micros(self.sale),
            commission_total: from_micros(self.commission),
            cargo_total: from_micros(self.cargo),
            seller_discount_total: from_micros(self.seller_discount),
            marketplace_discount_total: from_micros(self.marketplace_discount),
            invoice_tax_total: from_micros(self.invoice_tax),
            total_deductions_total: from_micros(self.total_deductions),
            net_profit_total: from_micros(self.net_profit),
            costed_line_count: self.costed_line_count,
            product_cost_total: from_micros(self.product_cost),
            true_net_profit_total: from_micros(self.net_profit.saturating_sub(self.product_cost)),
        }
    }
}

/// Totals plus one row per line of every in-window order
#[derive(Debug, Clone, Default)]
pub struct PeriodReport {
    pub totals: PeriodTotals,
    pub rows: Vec<ProfitLineDto>,
}

/// Allocation, per-line profit and totals for one order
pub fn aggregate_order(
    order: &MarketplaceOrder,
    settings: &ReportSettings,
    sku_costs: &HashMap<String, f64>,
) -> PeriodReport {
    let allocated = allocate_order_cargo(order, settings.cargo_rounding);
    let mut report = PeriodReport::default();
    report.totals.order_count = 1;

    for line in order.line_views() {
        let cargo = line
            .id()
            .and_then(|id| allocated.get(&id).copied())
            .unwrap_or(0.0);
        let sku = line.sku();
        let unit_cost = if sku.is_empty() {
            None
        } else {
            sku_costs.get(&sku).copied()
        };

        let breakdown = calc_profit_for_line(line, cargo, settings, unit_cost);
        report.totals.add_line(&breakdown);
        report
            .rows
            .push(profit_row(&order.order_number, line, &breakdown));
    }
    report
}

/// Суммирование по периоду `[start_ms, end_ms]` включительно.
///
/// Orders without a numeric `orderDate` count as in-window.
pub fn aggregate_period(
    orders: &[MarketplaceOrder],
    window: (i64, i64),
    settings: &ReportSettings,
    sku_costs: &HashMap<String, f64>,
) -> PeriodReport {
    let (start_ms, end_ms) = window;
    let mut report = PeriodReport::default();

    for order in orders.iter().filter(|o| o.is_in_window(start_ms, end_ms)) {
        let order_report = aggregate_order(order, settings, sku_costs);
        report.totals.merge(&order_report.totals);
        report.rows.extend(order_report.rows);
    }
    report
}
