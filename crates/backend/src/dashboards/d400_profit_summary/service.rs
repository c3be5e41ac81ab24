use contracts::dashboards::d400_profit_summary::{
    DateRange, EnvCheckResponse, ProfitSummaryResponse,
};
use contracts::projections::p900_cargo_allocation::CargoMapResponse;
use contracts::projections::p901_profit_lines::{LineSample, LineSampleResponse, ProfitLinesResponse};
use serde_json::Value;

use super::aggregation::{aggregate_period, PeriodReport};
use super::export::{build_report_csv, report_file_name};
use crate::domain::a001_marketplace_order::MarketplaceOrder;
use crate::projections::p900_cargo_allocation::service::load_cargo_maps;
use crate::projections::p900_cargo_allocation::{
    allocate_order_cargo, resolve_cargo_total, CargoMaps,
};
use crate::projections::p901_profit_lines::{calc_profit_for_line, profit_row};
use crate::shared::config::split_serials;
use crate::shared::fields::round2;
use crate::shared::marketplaces::SourceError;
use crate::shared::period::{self, PeriodError};
use crate::system::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Period(#[from] PeriodError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("SKU cost store failed: {0}")]
    Store(#[source] anyhow::Error),
    #[error("spreadsheet export failed: {0}")]
    Export(#[from] csv::Error),
}

/// Orders of the period with their cargo totals attached
pub struct PeriodOrders {
    pub window: (i64, i64),
    pub orders: Vec<MarketplaceOrder>,
    pub cargo_maps: CargoMaps,
}

/// Fetch the orders of the window and resolve the cargo total of each one
pub async fn load_period_orders(
    state: &AppState,
    range: &DateRange,
) -> Result<PeriodOrders, ReportError> {
    let window = period::date_range_to_ms(
        &range.start,
        &range.end,
        state.config.server.utc_offset_hours,
    )?;

    let raw_orders = state.source.fetch_orders(Some(window)).await?;
    let cargo_maps = load_configured_cargo_maps(state, &state.config.trendyol.cargo_invoice_serials).await?;
    let fallback = state.tariff_fallback();

    let orders: Vec<MarketplaceOrder> = raw_orders
        .iter()
        .filter_map(MarketplaceOrder::from_value)
        .map(|order| {
            let cargo_total = resolve_cargo_total(&cargo_maps, fallback.as_ref(), &order);
            order.with_cargo_total(cargo_total)
        })
        .collect();

    tracing::info!(
        "D400: {} orders fetched for {}..{}",
        orders.len(),
        range.start,
        range.end
    );
    Ok(PeriodOrders {
        window,
        orders,
        cargo_maps,
    })
}

async fn load_configured_cargo_maps(
    state: &AppState,
    serials: &[String],
) -> Result<CargoMaps, ReportError> {
    if serials.is_empty() {
        return Ok(CargoMaps::default());
    }
    let trendyol = &state.config.trendyol;
    let maps = load_cargo_maps(
        state.source.as_ref(),
        serials,
        trendyol.invoice_page_size,
        trendyol.max_pages,
    )
    .await?;
    Ok(maps)
}

/// Full computation for a period: totals and rows
pub async fn build_period_report(
    state: &AppState,
    range: &DateRange,
) -> Result<PeriodReport, ReportError> {
    let period_orders = load_period_orders(state, range).await?;
    let sku_costs = state
        .cost_store
        .snapshot()
        .await
        .map_err(ReportError::Store)?;

    Ok(aggregate_period(
        &period_orders.orders,
        period_orders.window,
        &state.settings,
        &sku_costs,
    ))
}

/// GET /report
pub async fn get_profit_summary(
    state: &AppState,
    range: DateRange,
) -> Result<ProfitSummaryResponse, ReportError> {
    let report = build_period_report(state, &range).await?;
    Ok(ProfitSummaryResponse {
        period: range,
        invoice_rate: state.settings.invoice_rate,
        summary: report.totals.to_dto(),
    })
}

/// GET /report/lines
pub async fn get_profit_lines(
    state: &AppState,
    range: DateRange,
) -> Result<ProfitLinesResponse, ReportError> {
    let report = build_period_report(state, &range).await?;
    Ok(ProfitLinesResponse {
        period: range,
        invoice_rate: state.settings.invoice_rate,
        count: report.rows.len(),
        rows: report.rows,
    })
}

/// GET /report/excel: file name and body
pub async fn export_period(
    state: &AppState,
    range: DateRange,
) -> Result<(String, Vec<u8>), ReportError> {
    let report = build_period_report(state, &range).await?;
    let body = build_report_csv(
        &range,
        state.settings.invoice_rate,
        &report.totals.to_dto(),
        &report.rows,
    )?;
    Ok((report_file_name(&range), body))
}

/// Today in the configured offset, as a one-day range
pub fn today_range(state: &AppState) -> DateRange {
    let today = period::today(state.config.server.utc_offset_hours);
    DateRange {
        start: today.clone(),
        end: today,
    }
}

/// GET /debug/line-sample: first line of the first in-window order that has lines
pub async fn get_line_sample(
    state: &AppState,
    range: DateRange,
) -> Result<LineSampleResponse, ReportError> {
    let period_orders = load_period_orders(state, &range).await?;
    let sku_costs = state
        .cost_store
        .snapshot()
        .await
        .map_err(ReportError::Store)?;

    let (start_ms, end_ms) = period_orders.window;
    let sample = period_orders
        .orders
        .iter()
        .filter(|order| order.is_in_window(start_ms, end_ms))
        .find_map(|order| {
            let line = order.line_views().next()?;
            let allocated = allocate_order_cargo(order, state.settings.cargo_rounding);
            let cargo = line
                .id()
                .and_then(|id| allocated.get(&id).copied())
                .unwrap_or(0.0);
            let unit_cost = sku_costs.get(&line.sku()).copied();
            let breakdown = calc_profit_for_line(line, cargo, &state.settings, unit_cost);

            Some(LineSample {
                order_number: order.order_number.clone(),
                package_ids: order.package_ids.clone(),
                order_cargo_total: round2(order.cargo_total),
                allocated_cargo: round2(cargo),
                calculated: profit_row(&order.order_number, line, &breakdown),
            })
        });

    Ok(LineSampleResponse {
        period: range,
        sample,
    })
}

/// GET /debug/cargo-map
pub async fn get_cargo_map(state: &AppState, serials: &str) -> Result<CargoMapResponse, ReportError> {
    let maps = load_configured_cargo_maps(state, &split_serials(serials)).await?;
    Ok(maps.to_response())
}

/// GET /debug/cargo-invoice/items: one raw page
pub async fn get_cargo_invoice_items(
    state: &AppState,
    serial: &str,
    page: u32,
) -> Result<Value, ReportError> {
    let page = state
        .source
        .fetch_cargo_invoice_page(serial.trim(), page, state.config.trendyol.invoice_page_size)
        .await?;
    Ok(page)
}

/// GET /env
pub fn env_check(state: &AppState) -> EnvCheckResponse {
    let trendyol = &state.config.trendyol;
    EnvCheckResponse {
        api_key_set: !trendyol.api_key.is_empty(),
        api_secret_set: !trendyol.api_secret.is_empty(),
        seller_id_set: !trendyol.seller_id.is_empty(),
        cargo_invoice_serials_set: !trendyol.cargo_invoice_serials.is_empty(),
        api_base: trendyol.api_base.clone(),
        finance_base: trendyol.finance_base.clone(),
        invoice_rate: state.settings.invoice_rate,
        page_size: trendyol.page_size,
        discount_policy: state.settings.discount_policy.code().to_string(),
        cargo_rounding: state.settings.cargo_rounding.code().to_string(),
        tariff_fallback: state.config.cargo.tariff_fallback,
        cost_store: state.cost_store.kind().to_string(),
    }
}
