use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Manually entered unit cost for a product SKU
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuCostDto {
    pub sku: String,
    pub unit_cost: f64,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body for POST /api/sku_cost
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuCostUpsertRequest {
    pub sku: String,
    pub unit_cost: f64,
}

impl SkuCostUpsertRequest {
    /// Trimmed SKU and a finite, positive cost, or a message for the caller
    pub fn validate(&self) -> Result<(String, f64), String> {
        let sku = self.sku.trim();
        if sku.is_empty() {
            return Err("sku must not be empty".to_string());
        }
        if !self.unit_cost.is_finite() || self.unit_cost <= 0.0 {
            return Err(format!("unit_cost must be positive, got {}", self.unit_cost));
        }
        Ok((sku.to_string(), self.unit_cost))
    }
}

/// Response for GET /api/sku_cost
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuCostListResponse {
    pub items: Vec<SkuCostDto>,
    pub total_count: usize,
}
