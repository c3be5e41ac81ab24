use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query for GET /debug/cargo-map?serials=SERIAL1,SERIAL2
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CargoMapRequest {
    pub serials: String,
}

/// Query for GET /debug/cargo-invoice/items?serial=SERIAL1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CargoInvoiceItemsRequest {
    pub serial: String,
    #[serde(default)]
    pub page: u32,
}

/// Cargo invoice amounts summed per order number and per parcel id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CargoMapResponse {
    pub by_order_number: BTreeMap<String, f64>,
    pub by_parcel_id: BTreeMap<String, f64>,
}
