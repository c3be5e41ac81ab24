use serde::{Deserialize, Serialize};

/// Report window as calendar days in format "YYYY-MM-DD", both ends inclusive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Totals over every line of every in-window order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummaryDto {
    /// Orders that passed the window filter (orders without a date included)
    pub order_count: u64,
    pub line_count: u64,
    pub sale_total: f64,
    pub commission_total: f64,
    pub cargo_total: f64,
    pub seller_discount_total: f64,
    /// Informational only, not part of the deductions
    pub marketplace_discount_total: f64,
    pub invoice_tax_total: f64,
    pub total_deductions_total: f64,
    pub net_profit_total: f64,
    /// Lines that had a manual SKU cost
    pub costed_line_count: u64,
    pub product_cost_total: f64,
    /// net_profit_total minus product_cost_total
    pub true_net_profit_total: f64,
}

/// Response for GET /report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitSummaryResponse {
    pub period: DateRange,
    pub invoice_rate: f64,
    pub summary: PeriodSummaryDto,
}

/// Response for GET /env
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvCheckResponse {
    pub api_key_set: bool,
    pub api_secret_set: bool,
    pub seller_id_set: bool,
    pub cargo_invoice_serials_set: bool,
    pub api_base: String,
    pub finance_base: String,
    pub invoice_rate: f64,
    pub page_size: u32,
    pub discount_policy: String,
    pub cargo_rounding: String,
    pub tariff_fallback: bool,
    /// "sqlite" or "memory"
    pub cost_store: String,
}
