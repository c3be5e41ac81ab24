use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;

use super::{MarketplaceSource, SourceError};
use crate::shared::config::TrendyolConfig;

/// HTTP-клиент для работы с Trendyol Supplier API
pub struct TrendyolClient {
    client: reqwest::Client,
    api_base: String,
    finance_base: String,
    seller_id: String,
    api_key: String,
    api_secret: String,
    page_size: u32,
    max_pages: u32,
}

impl TrendyolClient {
    /// Missing credentials are not an error here: the service still starts
    /// and every request reports them instead.
    pub fn new(config: &TrendyolConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            finance_base: config.finance_base.trim_end_matches('/').to_string(),
            seller_id: config.seller_id.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            page_size: config.page_size.max(1),
            max_pages: config.max_pages.max(1),
        })
    }

    /// Authorization and User-Agent header values
    fn auth_headers(&self) -> Result<(String, String), SourceError> {
        if self.api_key.is_empty() || self.api_secret.is_empty() || self.seller_id.is_empty() {
            return Err(SourceError::Config(
                "TRENDYOL_API_KEY/SECRET/SELLER_ID are required".into(),
            ));
        }
        let token =
            general_purpose::STANDARD.encode(format!("{}:{}", self.api_key, self.api_secret));
        Ok((
            format!("Basic {}", token),
            format!("{} - Trendyol API", self.seller_id),
        ))
    }

    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, SourceError> {
        let (authorization, user_agent) = self.auth_headers()?;

        tracing::debug!("Trendyol GET {} {:?}", url, query);
        let response = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .header(reqwest::header::USER_AGENT, user_agent)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status.as_u16() >= 400 {
            tracing::error!("Trendyol API returned HTTP {} for {}", status.as_u16(), url);
            return Err(SourceError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Null) => Ok(Value::Object(Default::default())),
            Ok(value) => Ok(value),
            Err(e) => Err(SourceError::Decode(e.to_string())),
        }
    }
}

/// `content` array of a paged response, empty when absent
pub fn page_content(page: &Value) -> &[Value] {
    page.get("content")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// True when the response says `page` is the last one
pub fn is_last_page(page_body: &Value, page: u32) -> bool {
    match page_body.get("totalPages").and_then(Value::as_i64) {
        Some(total_pages) => i64::from(page) >= total_pages - 1,
        None => false,
    }
}

#[async_trait]
impl MarketplaceSource for TrendyolClient {
    async fn fetch_orders(&self, window: Option<(i64, i64)>) -> Result<Vec<Value>, SourceError> {
        let url = format!("{}/sapigw/suppliers/{}/orders", self.api_base, self.seller_id);
        let mut orders = Vec::new();
        let mut page: u32 = 0;

        loop {
            let mut query = vec![("page", page.to_string()), ("size", self.page_size.to_string())];
            if let Some((start_ms, end_ms)) = window {
                query.push(("startDate", start_ms.to_string()));
                query.push(("endDate", end_ms.to_string()));
            }

            let body = self.get_json(&url, &query).await?;
            let content = page_content(&body);
            if content.is_empty() {
                break;
            }
            orders.extend(content.iter().cloned());

            if is_last_page(&body, page) {
                break;
            }

            page += 1;
            if page >= self.max_pages {
                tracing::warn!(
                    "Reached maximum page limit ({}), stopping pagination",
                    self.max_pages
                );
                break;
            }
        }

        tracing::info!("Trendyol: fetched {} orders in {} page(s)", orders.len(), page + 1);
        Ok(orders)
    }

    async fn fetch_cargo_invoice_page(
        &self,
        serial: &str,
        page: u32,
        size: u32,
    ) -> Result<Value, SourceError> {
        let url = format!(
            "{}/integration/finance/che/sellers/{}/cargo-invoice/{}/items",
            self.finance_base, self.seller_id, serial
        );
        self.get_json(&url, &[("page", page.to_string()), ("size", size.to_string())])
            .await
    }
}
