use contracts::projections::p900_cargo_allocation::CargoMapResponse;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::domain::a001_marketplace_order::MarketplaceOrder;
use crate::shared::fields::{as_amount, pick_text};

/// Cargo invoice amounts summed by order number and by parcel id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CargoMaps {
    pub by_order_number: HashMap<String, f64>,
    pub by_parcel_id: HashMap<String, f64>,
}

impl CargoMaps {
    pub fn build(items: &[Value]) -> Self {
        let mut maps = Self::default();
        maps.add_items(items);
        maps
    }

    /// Fold one page of cargo invoice items into the maps
    pub fn add_items(&mut self, items: &[Value]) {
        for item in items.iter().filter_map(Value::as_object) {
            let amount = as_amount(item.get("amount"));

            if let Some(order_number) = pick_text(item, &["orderNumber"]) {
                *self.by_order_number.entry(order_number).or_insert(0.0) += amount;
            }
            if let Some(parcel_id) = pick_text(item, &["parcelUniqueId"]) {
                *self.by_parcel_id.entry(parcel_id).or_insert(0.0) += amount;
            }
        }
    }

    /// Cargo total invoiced for an order.
    ///
    /// Package ids are tried first (first match wins), then the order
    /// number, then the order number without leading zeros.
    pub fn resolve(&self, order: &MarketplaceOrder) -> Option<f64> {
        if let Some(amount) = order
            .package_ids
            .iter()
            .find_map(|id| self.by_parcel_id.get(id))
        {
            return Some(*amount);
        }

        let order_number = order.order_number.trim();
        if order_number.is_empty() {
            return None;
        }
        if let Some(amount) = self.by_order_number.get(order_number) {
            return Some(*amount);
        }
        self.by_order_number
            .get(order_number.trim_start_matches('0'))
            .copied()
    }

    pub fn to_response(&self) -> CargoMapResponse {
        fn sorted(map: &HashMap<String, f64>) -> BTreeMap<String, f64> {
            map.iter().map(|(k, v)| (k.clone(), *v)).collect()
        }
        CargoMapResponse {
            by_order_number: sorted(&self.by_order_number),
            by_parcel_id: sorted(&self.by_parcel_id),
        }
    }
}

/// Flat carrier tariffs used when an order has no cargo invoice entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TariffFallback {
    pub default_tariff: f64,
    pub tariffs: HashMap<String, f64>,
}

impl TariffFallback {
    pub fn tariff_for(&self, provider: Option<&str>) -> f64 {
        provider
            .and_then(|name| self.tariffs.get(name.trim()))
            .copied()
            .unwrap_or(self.default_tariff)
    }
}

/// Order-level cargo total: invoice first, tariff (when enabled) second, else 0
pub fn resolve_cargo_total(
    maps: &CargoMaps,
    fallback: Option<&TariffFallback>,
    order: &MarketplaceOrder,
) -> f64 {
    if let Some(amount) = maps.resolve(order) {
        return amount;
    }
    match fallback {
        Some(tariffs) => tariffs.tariff_for(order.cargo_provider.as_deref()),
        None => 0.0,
    }
}
