pub mod a001_marketplace_order;
pub mod a002_sku_cost;
