pub mod trendyol;

use async_trait::async_trait;
use serde_json::Value;

/// Ошибки источника данных маркетплейса
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("marketplace credentials are not configured: {0}")]
    Config(String),
    #[error("marketplace request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("marketplace returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("marketplace response is not valid JSON: {0}")]
    Decode(String),
}

/// Supplier of raw order records and cargo invoice pages.
///
/// Records are returned as raw JSON; interpretation happens in the engine.
#[async_trait]
pub trait MarketplaceSource: Send + Sync {
    /// All orders for an optional `(start_ms, end_ms)` window, every page
    async fn fetch_orders(&self, window: Option<(i64, i64)>) -> Result<Vec<Value>, SourceError>;

    /// One page of items of a cargo invoice, as returned by the API
    async fn fetch_cargo_invoice_page(
        &self,
        serial: &str,
        page: u32,
        size: u32,
    ) -> Result<Value, SourceError>;
}
