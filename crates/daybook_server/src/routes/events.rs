//! Event CRUD and cleanup endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use daybook_core::{CreateEventRequest, Event, EventId, EventPatch};
use serde::{Deserialize, Serialize};

use crate::routes::{ApiError, JsonBody, PathParam, QueryParams};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/cleanup", post(cleanup))
        .route(
            "/api/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}

/// Query string for listing events
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Date prefix, usually `YYYY-MM`
    pub month: Option<String>,
}

/// Result of a manual cleanup
#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub message: String,
    pub removed: usize,
}

/// GET /api/events - Purge past events, then list the rest
async fn list_events(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let today = state.today();
    let events = state
        .with_service(move |service| service.list(query.month.as_deref(), today))
        .await?;
    Ok(Json(events))
}

/// GET /api/events/:id
async fn get_event(
    State(state): State<AppState>,
    PathParam(id): PathParam<EventId>,
) -> Result<Json<Event>, ApiError> {
    let event = state.with_service(move |service| service.get(id)).await?;
    Ok(Json(event))
}

/// POST /api/events - Create a new event
async fn create_event(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    let today = state.today();
    let event = state
        .with_service(move |service| service.create(&req, today))
        .await?;
    Ok(Json(event))
}

/// PUT /api/events/:id - Partial update
async fn update_event(
    State(state): State<AppState>,
    PathParam(id): PathParam<EventId>,
    JsonBody(patch): JsonBody<EventPatch>,
) -> Result<Json<Event>, ApiError> {
    let today = state.today();
    let event = state
        .with_service(move |service| service.update(id, &patch, today))
        .await?;
    Ok(Json(event))
}

/// DELETE /api/events/:id - Returns the deleted event
async fn delete_event(
    State(state): State<AppState>,
    PathParam(id): PathParam<EventId>,
) -> Result<Json<Event>, ApiError> {
    let event = state.with_service(move |service| service.delete(id)).await?;
    Ok(Json(event))
}

/// POST /api/events/cleanup - Purge past events on demand
async fn cleanup(State(state): State<AppState>) -> Result<Json<CleanupResponse>, ApiError> {
    let today = state.today();
    let removed = state
        .with_service(move |service| service.run_cleanup(today))
        .await?;
    Ok(Json(CleanupResponse {
        message: "Past events cleaned up".to_string(),
        removed,
    }))
}
