use serde_json::Value;

use crate::shared::fields::{as_text, pick_text, JsonObject};

use super::line::LineView;

const PACKAGE_ID_KEYS: &[&str] = &["parcelUniqueId", "packageId", "shipmentId"];

/// Snapshot of one marketplace order for a single report computation.
///
/// Built from the raw order record. `cargo_total` is resolved separately
/// (cargo invoice or tariff) and attached by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketplaceOrder {
    pub order_number: String,
    /// Milliseconds since epoch; None when `orderDate` is not a JSON number
    pub order_date: Option<i64>,
    pub cargo_total: f64,
    /// Package identifiers in lookup order, de-duplicated
    pub package_ids: Vec<String>,
    pub cargo_provider: Option<String>,
    pub lines: Vec<Value>,
}

impl MarketplaceOrder {
    /// None for records that are not JSON objects
    pub fn from_value(raw: &Value) -> Option<Self> {
        raw.as_object().map(Self::from_object)
    }

    pub fn from_object(raw: &JsonObject) -> Self {
        let order_date = match raw.get("orderDate") {
            Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|v| v as i64)),
            _ => None,
        };
        let lines = match raw.get("lines") {
            Some(Value::Array(lines)) => lines.clone(),
            _ => Vec::new(),
        };

        Self {
            order_number: pick_text(raw, &["orderNumber"]).unwrap_or_default(),
            order_date,
            cargo_total: 0.0,
            package_ids: package_ids(raw),
            cargo_provider: pick_text(raw, &["cargoProviderName"]),
            lines,
        }
    }

    pub fn with_cargo_total(mut self, cargo_total: f64) -> Self {
        self.cargo_total = cargo_total;
        self
    }

    /// Object lines only; other entries carry nothing usable
    pub fn line_views(&self) -> impl Iterator<Item = LineView<'_>> {
        self.lines.iter().filter_map(LineView::new)
    }

    /// Inclusive window check. Orders without a timestamp are always in.
    pub fn is_in_window(&self, start_ms: i64, end_ms: i64) -> bool {
        match self.order_date {
            Some(ts) => start_ms <= ts && ts <= end_ms,
            None => true,
        }
    }
}

/// shipmentPackageId, originPackageIds[], then the alternative names some
/// payloads use
fn package_ids(raw: &JsonObject) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();

    if let Some(id) = raw.get("shipmentPackageId").and_then(as_text) {
        ids.push(id);
    }
    if let Some(Value::Array(origin)) = raw.get("originPackageIds") {
        ids.extend(origin.iter().filter_map(as_text));
    }
    ids.extend(
        PACKAGE_ID_KEYS
            .iter()
            .filter_map(|key| raw.get(*key))
            .filter_map(as_text),
    );

    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}
