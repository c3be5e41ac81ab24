use contracts::enums::{CargoRounding, DiscountMergePolicy};
use contracts::projections::p901_profit_lines::ProfitLineDto;

use crate::domain::a001_marketplace_order::LineView;
use crate::shared::config::ReportConfig;
use crate::shared::fields::round2;

/// Immutable knobs of one report computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportSettings {
    pub invoice_rate: f64,
    pub discount_policy: DiscountMergePolicy,
    pub cargo_rounding: CargoRounding,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            invoice_rate: 0.10,
            discount_policy: DiscountMergePolicy::Sum,
            cargo_rounding: CargoRounding::Exact,
        }
    }
}

impl From<&ReportConfig> for ReportSettings {
    fn from(config: &ReportConfig) -> Self {
        Self {
            invoice_rate: config.invoice_rate,
            discount_policy: config.discount_policy,
            cargo_rounding: config.cargo_rounding,
        }
    }
}

/// Unrounded profit figures of one line
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProfitBreakdown {
    pub quantity: f64,
    pub sale: f64,
    pub commission: f64,
    pub cargo: f64,
    pub seller_discount: f64,
    /// Informational, never deducted
    pub marketplace_discount: f64,
    pub invoice_base: f64,
    pub invoice_tax: f64,
    pub total_deductions: f64,
    pub net_profit: f64,
    pub unit_cost: Option<f64>,
    pub product_cost: Option<f64>,
    pub true_net_profit: Option<f64>,
}

/// Расчёт прибыли по строке заказа.
///
/// Никогда не падает: некорректные поля уже сведены к 0 в `LineView`.
pub fn calc_profit_for_line(
    line: LineView<'_>,
    allocated_cargo: f64,
    settings: &ReportSettings,
    unit_cost: Option<f64>,
) -> ProfitBreakdown {
    let quantity = line.quantity();
    let sale = line.sale_price();
    let commission = line.commission();
    let (seller_discount, marketplace_discount) = line.discounts(settings.discount_policy);
    let cargo = if allocated_cargo.is_finite() {
        allocated_cargo
    } else {
        0.0
    };

    // the tax base follows what the seller actually receives
    let invoice_base = (sale - seller_discount).max(0.0);
    let invoice_tax = invoice_base * settings.invoice_rate;
    let total_deductions = commission + cargo + seller_discount + invoice_tax;
    let net_profit = sale - total_deductions;

    let unit_cost = unit_cost.filter(|c| c.is_finite() && *c > 0.0);
    let product_cost = unit_cost.map(|c| c * quantity);
    let true_net_profit = product_cost.map(|cost| net_profit - cost);

    ProfitBreakdown {
        quantity,
        sale,
        commission,
        cargo,
        seller_discount,
        marketplace_discount,
        invoice_base,
        invoice_tax,
        total_deductions,
        net_profit,
        unit_cost,
        product_cost,
        true_net_profit,
    }
}

/// Output row: display fields of the line plus the breakdown rounded to cents
pub fn profit_row(order_number: &str, line: LineView<'_>, p: &ProfitBreakdown) -> ProfitLineDto {
    ProfitLineDto {
        order_number: order_number.to_string(),
        product_name: line.product_name(),
        sku: line.sku(),
        campaign: line.campaign(),
        quantity: p.quantity,
        sale: round2(p.sale),
        commission: round2(p.commission),
        cargo: round2(p.cargo),
        seller_discount: round2(p.seller_discount),
        marketplace_discount: round2(p.marketplace_discount),
        invoice_tax: round2(p.invoice_tax),
        total_deductions: round2(p.total_deductions),
        net_profit: round2(p.net_profit),
        unit_cost: p.unit_cost.map(round2),
        product_cost: p.product_cost.map(round2),
        true_net_profit: p.true_net_profit.map(round2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn calc(raw: Value, cargo: f64, settings: &ReportSettings, cost: Option<f64>) -> ProfitBreakdown {
        let line = LineView::new(&raw).expect("object");
        calc_profit_for_line(line, cargo, settings, cost)
    }

    #[test]
    fn test_profit_formula_concrete_case() {
        let p = calc(
            json!({ "price": 300, "commission": 30, "lineSellerDiscount": 20 }),
            29.9,
            &ReportSettings::default(),
            None,
        );
        assert_eq!(p.invoice_base, 280.0);
        assert!((p.invoice_tax - 28.0).abs() < 1e-9);
        assert!((p.total_deductions - 107.9).abs() < 1e-9);
        assert!((p.net_profit - 192.1).abs() < 1e-9);
        assert_eq!(p.true_net_profit, None);
    }

    #[test]
    fn test_missing_fields_degrade_to_zero() {
        let p = calc(json!({ "price": 200 }), 15.0, &ReportSettings::default(), None);
        assert_eq!(p.commission, 0.0);
        assert_eq!(p.seller_discount, 0.0);
        assert_eq!(p.marketplace_discount, 0.0);
        assert!((p.net_profit - (200.0 - 20.0 - 15.0)).abs() < 1e-9);

        let p = calc(
            json!({ "price": {}, "commission": "n/a", "discountDetails": 5 }),
            f64::NAN,
            &ReportSettings::default(),
            None,
        );
        assert_eq!(p.sale, 0.0);
        assert_eq!(p.cargo, 0.0);
        assert_eq!(p.net_profit, 0.0);
    }

    #[test]
    fn test_marketplace_discount_is_informational() {
        let with = calc(
            json!({ "price": 100, "tyDiscount": 40 }),
            0.0,
            &ReportSettings::default(),
            None,
        );
        let without = calc(json!({ "price": 100 }), 0.0, &ReportSettings::default(), None);
        assert_eq!(with.marketplace_discount, 40.0);
        assert_eq!(with.net_profit, without.net_profit);
        assert_eq!(with.invoice_base, 100.0);
    }

    #[test]
    fn test_invoice_base_never_negative() {
        let p = calc(
            json!({ "price": 50, "sellerDiscount": 80 }),
            0.0,
            &ReportSettings::default(),
            None,
        );
        assert_eq!(p.invoice_base, 0.0);
        assert_eq!(p.invoice_tax, 0.0);
        assert_eq!(p.net_profit, -30.0);
    }

    #[test]
    fn test_sku_cost_gives_true_net() {
        let p = calc(
            json!({ "price": 300, "quantity": 2 }),
            0.0,
            &ReportSettings::default(),
            Some(50.0),
        );
        assert_eq!(p.product_cost, Some(100.0));
        assert!((p.net_profit - 270.0).abs() < 1e-9);
        assert!((p.true_net_profit.unwrap() - 170.0).abs() < 1e-9);

        let ignored = calc(json!({ "price": 300 }), 0.0, &ReportSettings::default(), Some(0.0));
        assert_eq!(ignored.product_cost, None);
    }

    #[test]
    fn test_invoice_rate_is_configurable() {
        let settings = ReportSettings {
            invoice_rate: 0.2,
            ..ReportSettings::default()
        };
        let p = calc(json!({ "price": 100 }), 0.0, &settings, None);
        assert!((p.invoice_tax - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_profit_row_rounds_at_output() {
        let raw = json!({
            "price": 99.999,
            "commission": 10.004,
            "productName": "Termos",
            "barcode": "869000",
            "salesCampaignId": 3
        });
        let line = LineView::new(&raw).expect("object");
        let p = calc_profit_for_line(line, 1.005, &ReportSettings::default(), None);
        let row = profit_row("A-1", line, &p);
        assert_eq!(row.order_number, "A-1");
        assert_eq!(row.product_name, "Termos");
        assert_eq!(row.sku, "869000");
        assert_eq!(row.campaign, "salesCampaignId:3");
        assert_eq!(row.sale, 100.0);
        assert_eq!(row.commission, 10.0);
        assert_eq!(row.net_profit, round2(p.net_profit));
        assert_eq!(row.unit_cost, None);
    }
}
