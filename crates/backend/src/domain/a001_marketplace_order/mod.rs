pub mod line;
pub mod order;

pub use line::{LineId, LineView};
pub use order::MarketplaceOrder;
