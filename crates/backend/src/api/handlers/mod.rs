pub mod a002_sku_cost;
pub mod system;

// Dashboard handlers
pub mod d400_profit_summary;
