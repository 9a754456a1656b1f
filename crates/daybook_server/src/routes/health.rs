//! Liveness endpoints

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use daybook_core::HealthReport;
use serde_json::{json, Value};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/api/health", get(health))
}

/// GET / - Banner
async fn home() -> Json<Value> {
    Json(json!({
        "message": "Calendar API is running!",
        "status": "ok",
    }))
}

/// GET /api/health - Store connectivity
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.health().await;
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}
