use axum::{
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers;
use crate::system::{self, state::SharedState};

/// Конфигурация всех роутов приложения
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(handlers::system::health))
        .route("/env", get(handlers::system::env_check))
        // ========================================
        // D400 PROFIT REPORT
        // ========================================
        .route(
            "/report",
            get(handlers::d400_profit_summary::get_profit_summary),
        )
        .route(
            "/report/lines",
            get(handlers::d400_profit_summary::get_profit_lines),
        )
        .route(
            "/report/excel",
            get(handlers::d400_profit_summary::get_profit_excel),
        )
        .route(
            "/report/excel/today",
            get(handlers::d400_profit_summary::get_profit_excel_today),
        )
        // Debug
        .route(
            "/debug/line-sample",
            get(handlers::d400_profit_summary::get_line_sample),
        )
        .route(
            "/debug/cargo-map",
            get(handlers::d400_profit_summary::get_cargo_map),
        )
        .route(
            "/debug/cargo-invoice/items",
            get(handlers::d400_profit_summary::get_cargo_invoice_items),
        )
        // A002 SKU cost overrides
        .route(
            "/api/sku_cost",
            get(handlers::a002_sku_cost::list_all).post(handlers::a002_sku_cost::upsert),
        )
        .route(
            "/api/sku_cost/:sku",
            get(handlers::a002_sku_cost::get_by_sku).delete(handlers::a002_sku_cost::delete),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            system::middleware::request_logger,
        ))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::domain::a002_sku_cost::InMemorySkuCostStore;
    use crate::shared::config::Config;
    use crate::shared::marketplaces::{MarketplaceSource, SourceError};
    use crate::system::state::AppState;

    /// Canned Trendyol answers
    struct FakeSource {
        orders: Vec<Value>,
        invoice_items: Vec<Value>,
        unavailable: bool,
    }

    #[async_trait]
    impl MarketplaceSource for FakeSource {
        async fn fetch_orders(&self, _: Option<(i64, i64)>) -> Result<Vec<Value>, SourceError> {
            if self.unavailable {
                return Err(SourceError::Upstream {
                    status: 503,
                    body: "maintenance".to_string(),
                });
            }
            Ok(self.orders.clone())
        }

        async fn fetch_cargo_invoice_page(
            &self,
            _serial: &str,
            page: u32,
            _size: u32,
        ) -> Result<Value, SourceError> {
            let content = if page == 0 {
                self.invoice_items.clone()
            } else {
                Vec::new()
            };
            Ok(json!({ "totalPages": 1, "content": content }))
        }
    }

    // 2024-06-01 12:00 at UTC+3
    const JUNE_FIRST_NOON: i64 = 1_717_189_200_000 + 12 * 3_600_000;

    fn source() -> FakeSource {
        FakeSource {
            orders: vec![json!({
                "orderNumber": "1001",
                "orderDate": JUNE_FIRST_NOON,
                "shipmentPackageId": 555,
                "lines": [{
                    "lineId": 1,
                    "price": 1000,
                    "commission": 100,
                    "lineSellerDiscount": 20,
                    "barcode": "SKU-1",
                    "productName": "Kupa"
                }]
            })],
            invoice_items: vec![json!({ "parcelUniqueId": 555, "orderNumber": "1001", "amount": 50 })],
            unavailable: false,
        }
    }

    fn app_with(source: FakeSource) -> Router {
        let mut config = Config::default();
        config.trendyol.cargo_invoice_serials = vec!["S1".to_string()];
        let state = AppState::new(
            config,
            Arc::new(source),
            Arc::new(InMemorySkuCostStore::default()),
        );
        build_router(state)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = send(app, method, uri, body).await;
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(source());
        let (status, body) = send_json(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "running" }));
    }

    #[tokio::test]
    async fn test_env_hides_secrets() {
        let app = app_with(source());
        let (status, body) = send_json(&app, "GET", "/env", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["api_key_set"], json!(false));
        assert_eq!(body["cargo_invoice_serials_set"], json!(true));
        assert_eq!(body["invoice_rate"], json!(0.1));
        assert_eq!(body["cost_store"], json!("memory"));
    }

    #[tokio::test]
    async fn test_report_summary() {
        let app = app_with(source());
        let (status, body) =
            send_json(&app, "GET", "/report?start=2024-06-01&end=2024-06-01", None).await;
        assert_eq!(status, StatusCode::OK);

        let summary = &body["summary"];
        assert_eq!(summary["order_count"], json!(1));
        assert_eq!(summary["sale_total"], json!(1000.0));
        assert_eq!(summary["cargo_total"], json!(50.0));
        assert_eq!(summary["invoice_tax_total"], json!(98.0));
        assert_eq!(summary["net_profit_total"], json!(732.0));
        assert_eq!(body["period"]["start"], json!("2024-06-01"));
    }

    #[tokio::test]
    async fn test_report_outside_window_is_empty() {
        let app = app_with(source());
        let (status, body) =
            send_json(&app, "GET", "/report?start=2024-06-02&end=2024-06-03", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["order_count"], json!(0));
        assert_eq!(body["summary"]["net_profit_total"], json!(0.0));
    }

    #[tokio::test]
    async fn test_report_rejects_bad_dates() {
        let app = app_with(source());
        let (status, _) = send(&app, "GET", "/report?start=2024-13-01&end=2024-06-01", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "GET", "/report?start=2024-06-05&end=2024-06-01", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let mut failing = source();
        failing.unavailable = true;
        let app = app_with(failing);
        let (status, _) = send(&app, "GET", "/report?start=2024-06-01&end=2024-06-01", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_lines_use_sku_cost() {
        let app = app_with(source());
        let (status, _) = send_json(
            &app,
            "POST",
            "/api/sku_cost",
            Some(json!({ "sku": " SKU-1 ", "unit_cost": 100 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) =
            send_json(&app, "GET", "/report/lines?start=2024-06-01&end=2024-06-01", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], json!(1));
        let row = &body["rows"][0];
        assert_eq!(row["order_number"], json!("1001"));
        assert_eq!(row["cargo"], json!(50.0));
        assert_eq!(row["net_profit"], json!(732.0));
        assert_eq!(row["true_net_profit"], json!(632.0));
    }

    #[tokio::test]
    async fn test_sku_cost_crud() {
        let app = app_with(source());

        let (status, _) = send(
            &app,
            "POST",
            "/api/sku_cost",
            Some(json!({ "sku": "", "unit_cost": 10 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            "POST",
            "/api/sku_cost",
            Some(json!({ "sku": "A", "unit_cost": 12.5 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send_json(&app, "GET", "/api/sku_cost", None).await;
        assert_eq!(body["total_count"], json!(1));
        assert_eq!(body["items"][0]["sku"], json!("A"));

        let (status, body) = send_json(&app, "GET", "/api/sku_cost/A", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["unit_cost"], json!(12.5));

        let (status, _) = send(&app, "DELETE", "/api/sku_cost/A", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "DELETE", "/api/sku_cost/A", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "GET", "/api/sku_cost/A", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_excel_download() {
        let app = app_with(source());
        let request = Request::builder()
            .uri("/report/excel?start=2024-06-01&end=2024-06-01")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "text/csv; charset=utf-8");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"trendyol_kar_zarar_2024-06-01_to_2024-06-01.csv\""
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert!(text.contains("1001;"));
        assert!(text.contains("732,00"));
    }

    #[tokio::test]
    async fn test_debug_cargo_endpoints() {
        let app = app_with(source());

        let (status, body) = send_json(&app, "GET", "/debug/cargo-map?serials=S1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["by_parcel_id"]["555"], json!(50.0));
        assert_eq!(body["by_order_number"]["1001"], json!(50.0));

        let (status, body) =
            send_json(&app, "GET", "/debug/line-sample?start=2024-06-01&end=2024-06-01", None)
                .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sample"]["order_number"], json!("1001"));
        assert_eq!(body["sample"]["allocated_cargo"], json!(50.0));
        assert_eq!(body["sample"]["package_ids"], json!(["555"]));

        let (status, body) =
            send_json(&app, "GET", "/debug/cargo-invoice/items?serial=S1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"][0]["amount"], json!(50));
    }

    #[tokio::test]
    async fn test_line_sample_respects_window() {
        let mut early = source();
        early.orders.insert(
            0,
            json!({
                "orderNumber": "0999",
                "orderDate": JUNE_FIRST_NOON - 2 * 86_400_000,
                "lines": [{ "lineId": 7, "price": 10 }]
            }),
        );
        let app = app_with(early);

        let (status, body) =
            send_json(&app, "GET", "/debug/line-sample?start=2024-06-01&end=2024-06-01", None)
                .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sample"]["order_number"], json!("1001"));

        let (_, body) =
            send_json(&app, "GET", "/debug/line-sample?start=2024-06-02&end=2024-06-03", None)
                .await;
        assert_eq!(body["sample"], Value::Null);
    }
}
