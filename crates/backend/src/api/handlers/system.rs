use axum::{extract::State, Json};
use contracts::dashboards::d400_profit_summary::EnvCheckResponse;
use serde_json::{json, Value};

use crate::dashboards::d400_profit_summary::service;
use crate::system::state::SharedState;

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "running" }))
}

/// GET /env: which settings are in effect, secrets reported as set/unset only
pub async fn env_check(State(state): State<SharedState>) -> Json<EnvCheckResponse> {
    Json(service::env_check(&state))
}
