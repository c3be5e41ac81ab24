use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use contracts::dashboards::d400_profit_summary::{DateRange, ProfitSummaryResponse};
use contracts::projections::p900_cargo_allocation::{
    CargoInvoiceItemsRequest, CargoMapRequest, CargoMapResponse,
};
use contracts::projections::p901_profit_lines::{LineSampleResponse, ProfitLinesResponse};
use serde_json::Value;

use crate::dashboards::d400_profit_summary::{service, ReportError};
use crate::shared::marketplaces::SourceError;
use crate::system::state::SharedState;

/// Bad dates are the caller's fault, marketplace failures are upstream ones
pub fn report_error_status(error: &ReportError) -> StatusCode {
    match error {
        ReportError::Period(_) => StatusCode::BAD_REQUEST,
        ReportError::Source(SourceError::Config(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        ReportError::Source(_) => StatusCode::BAD_GATEWAY,
        ReportError::Store(_) | ReportError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn fail(context: &str, error: ReportError) -> StatusCode {
    let status = report_error_status(&error);
    if status == StatusCode::BAD_REQUEST {
        tracing::warn!("D400 Report: {}: {}", context, error);
    } else {
        tracing::error!("D400 Report: {}: {}", context, error);
    }
    status
}

/// GET /report?start=2024-06-01&end=2024-06-07
pub async fn get_profit_summary(
    State(state): State<SharedState>,
    Query(range): Query<DateRange>,
) -> Result<Json<ProfitSummaryResponse>, StatusCode> {
    tracing::info!("D400 Report: summary for {}..{}", range.start, range.end);

    match service::get_profit_summary(&state, range).await {
        Ok(response) => {
            tracing::info!(
                "D400 Report: {} orders, net profit {:.2}",
                response.summary.order_count,
                response.summary.net_profit_total
            );
            Ok(Json(response))
        }
        Err(e) => Err(fail("Failed to build summary", e)),
    }
}

/// GET /report/lines?start=2024-06-01&end=2024-06-07
pub async fn get_profit_lines(
    State(state): State<SharedState>,
    Query(range): Query<DateRange>,
) -> Result<Json<ProfitLinesResponse>, StatusCode> {
    match service::get_profit_lines(&state, range).await {
        Ok(response) => {
            tracing::info!("D400 Report: returning {} rows", response.count);
            Ok(Json(response))
        }
        Err(e) => Err(fail("Failed to build lines", e)),
    }
}

fn excel_response(file_name: String, body: Vec<u8>) -> Response {
    (
        [
            (
                header::CONTENT_TYPE,
                "text/csv; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}

/// GET /report/excel?start=2024-06-01&end=2024-06-07
pub async fn get_profit_excel(
    State(state): State<SharedState>,
    Query(range): Query<DateRange>,
) -> Result<Response, StatusCode> {
    match service::export_period(&state, range).await {
        Ok((file_name, body)) => Ok(excel_response(file_name, body)),
        Err(e) => Err(fail("Failed to export", e)),
    }
}

/// GET /report/excel/today
pub async fn get_profit_excel_today(
    State(state): State<SharedState>,
) -> Result<Response, StatusCode> {
    let range = service::today_range(&state);
    match service::export_period(&state, range).await {
        Ok((file_name, body)) => Ok(excel_response(file_name, body)),
        Err(e) => Err(fail("Failed to export today", e)),
    }
}

/// GET /debug/line-sample?start=2024-06-01&end=2024-06-07
pub async fn get_line_sample(
    State(state): State<SharedState>,
    Query(range): Query<DateRange>,
) -> Result<Json<LineSampleResponse>, StatusCode> {
    service::get_line_sample(&state, range)
        .await
        .map(Json)
        .map_err(|e| fail("Failed to build line sample", e))
}

/// GET /debug/cargo-map?serials=SERIAL1,SERIAL2
pub async fn get_cargo_map(
    State(state): State<SharedState>,
    Query(request): Query<CargoMapRequest>,
) -> Result<Json<CargoMapResponse>, StatusCode> {
    service::get_cargo_map(&state, &request.serials)
        .await
        .map(Json)
        .map_err(|e| fail("Failed to build cargo map", e))
}

/// GET /debug/cargo-invoice/items?serial=SERIAL1
pub async fn get_cargo_invoice_items(
    State(state): State<SharedState>,
    Query(request): Query<CargoInvoiceItemsRequest>,
) -> Result<Json<Value>, StatusCode> {
    service::get_cargo_invoice_items(&state, &request.serial, request.page)
        .await
        .map(Json)
        .map_err(|e| fail("Failed to read cargo invoice", e))
}
