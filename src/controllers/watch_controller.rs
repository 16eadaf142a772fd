use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;

#[derive(Deserialize)]
pub struct CreateWatchBody {
    #[serde(rename = "roomId")]
    pub room_id: String,
    pub symbol: String,
}

// POST /watches
pub async fn post_create_watch(
    State(state): State<AppState>,
    Json(body): Json<CreateWatchBody>,
) -> Response {
    let room_id = body.room_id.trim().to_string();
    let symbol = body.symbol.trim().to_uppercase();

    if room_id.is_empty() || symbol.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "roomId and symbol are required" })),
        )
            .into_response();
    }

    match state.watches.activate(&room_id, &symbol).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(json!({ "roomId": room_id, "symbol": symbol })),
        )
            .into_response(),
        Err(e) => (StatusCode::CONFLICT, Json(json!({ "error": e }))).into_response(),
    }
}

// DELETE /watches/:room_id
pub async fn delete_watch(State(state): State<AppState>, Path(room_id): Path<String>) -> Response {
    match state.watches.deactivate(&room_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => (StatusCode::NOT_FOUND, Json(json!({ "error": e }))).into_response(),
    }
}

// POST /watches/:room_id/pause
pub async fn post_pause_watch(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Response {
    match state.watches.pause(&room_id).await {
        Ok(()) => Json(json!({ "roomId": room_id, "paused": true })).into_response(),
        Err(e) => (StatusCode::NOT_FOUND, Json(json!({ "error": e }))).into_response(),
    }
}

// POST /watches/:room_id/resume
pub async fn post_resume_watch(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Response {
    match state.watches.resume(&room_id).await {
        Ok(()) => Json(json!({ "roomId": room_id, "paused": false })).into_response(),
        Err(e) => (StatusCode::NOT_FOUND, Json(json!({ "error": e }))).into_response(),
    }
}
