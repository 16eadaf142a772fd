use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

// GET /health
pub async fn get_health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// GET /status
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let watches = state.watches.status().await;

    Json(json!({
        "scheduledOrdersEnabled": state.settings.scheduled_orders_enabled,
        "fillTickSecs": state.settings.fill_tick_secs,
        "watches": watches,
    }))
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}
