use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::state::AppState;

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Hello World" }))
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = Utc::now() - state.started_at;
    Json(json!({
        "status": "ok",
        "catalog_records": state.catalog.len(),
        "started_at": state.started_at.to_rfc3339(),
        "uptime_secs": uptime.num_seconds()
    }))
}
