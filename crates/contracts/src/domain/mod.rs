pub mod a002_sku_cost;
