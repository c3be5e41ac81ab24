use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use contracts::domain::a002_sku_cost::{SkuCostDto, SkuCostListResponse, SkuCostUpsertRequest};

use crate::system::state::SharedState;

/// GET /api/sku_cost
pub async fn list_all(
    State(state): State<SharedState>,
) -> Result<Json<SkuCostListResponse>, StatusCode> {
    match state.cost_store.list().await {
        Ok(items) => Ok(Json(SkuCostListResponse {
            total_count: items.len(),
            items,
        })),
        Err(e) => {
            tracing::error!("Failed to list SKU costs: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/sku_cost/:sku
pub async fn get_by_sku(
    State(state): State<SharedState>,
    Path(sku): Path<String>,
) -> Result<Json<SkuCostDto>, StatusCode> {
    match state.cost_store.get(sku.trim()).await {
        Ok(Some(item)) => Ok(Json(item)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to read SKU cost {}: {}", sku, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/sku_cost
pub async fn upsert(
    State(state): State<SharedState>,
    Json(request): Json<SkuCostUpsertRequest>,
) -> Result<Json<SkuCostDto>, StatusCode> {
    let (sku, unit_cost) = request.validate().map_err(|message| {
        tracing::warn!("Rejected SKU cost: {}", message);
        StatusCode::BAD_REQUEST
    })?;

    match state.cost_store.upsert(&sku, unit_cost).await {
        Ok(item) => {
            tracing::info!("SKU cost saved: {} = {:.2}", item.sku, item.unit_cost);
            Ok(Json(item))
        }
        Err(e) => {
            tracing::error!("Failed to save SKU cost {}: {}", sku, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// DELETE /api/sku_cost/:sku
pub async fn delete(
    State(state): State<SharedState>,
    Path(sku): Path<String>,
) -> Result<StatusCode, StatusCode> {
    match state.cost_store.delete(sku.trim()).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to delete SKU cost {}: {}", sku, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
