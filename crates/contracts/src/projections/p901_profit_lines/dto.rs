use serde::{Deserialize, Serialize};

use crate::dashboards::d400_profit_summary::DateRange;

/// One report row per order line. Money fields are rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitLineDto {
    pub order_number: String,
    pub product_name: String,
    /// Barcode, falling back to merchant SKU
    pub sku: String,
    /// "salesCampaignId:<id>" or empty
    pub campaign: String,
    pub quantity: f64,
    pub sale: f64,
    pub commission: f64,
    pub cargo: f64,
    pub seller_discount: f64,
    pub marketplace_discount: f64,
    pub invoice_tax: f64,
    pub total_deductions: f64,
    pub net_profit: f64,

    // Present only when a manual SKU cost exists
    pub unit_cost: Option<f64>,
    pub product_cost: Option<f64>,
    pub true_net_profit: Option<f64>,
}

/// Response for GET /report/lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitLinesResponse {
    pub period: DateRange,
    pub invoice_rate: f64,
    pub count: usize,
    pub rows: Vec<ProfitLineDto>,
}

/// Single line with its cargo resolution, for troubleshooting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSample {
    pub order_number: String,
    pub package_ids: Vec<String>,
    pub order_cargo_total: f64,
    pub allocated_cargo: f64,
    pub calculated: ProfitLineDto,
}

/// Response for GET /debug/line-sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSampleResponse {
    pub period: DateRange,
    /// None when no order in the window has lines
    pub sample: Option<LineSample>,
}
