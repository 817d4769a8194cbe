//! Event administration

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use shared::error::{ApiResponse, AppError};
use shared::models::{Event, EventInput};

use crate::api::ApiResult;
use crate::db;
use crate::error::ServiceError;
use crate::services::events as event_service;
use crate::state::AppState;
use crate::time::semester_at;

/// POST /api/admin/events
pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<EventInput>,
) -> ApiResult<Event> {
    let default_semester = semester_at(payload.event_start, state.org_timezone);
    let fields = payload.resolve(default_semester)?;
    let event = event_service::create_event(&state.store(), &fields).await?;
    Ok(Json(event))
}

/// GET /api/admin/events/{id}
pub async fn get_event(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Event> {
    let event = db::events::get_event(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::event_not_found(id))?;
    Ok(Json(event))
}

/// PUT /api/admin/events/{id}
///
/// Full replacement: omitted form times fall back to the event times again.
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<EventInput>,
) -> ApiResult<Event> {
    let default_semester = semester_at(payload.event_start, state.org_timezone);
    let fields = payload.resolve(default_semester)?;
    let event = db::events::update_event(&state.pool, id, &fields)
        .await?
        .ok_or_else(|| AppError::event_not_found(id))?;
    tracing::info!(event_id = id, "Event updated");
    Ok(Json(event))
}

/// DELETE /api/admin/events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<()>, ServiceError> {
    if !db::events::delete_event(&state.pool, id).await? {
        return Err(AppError::event_not_found(id).into());
    }
    tracing::info!(event_id = id, "Event deleted");
    Ok(ApiResponse::ok())
}

#[derive(Serialize)]
pub struct CheckinLink {
    pub event_id: i64,
    pub page_id: String,
    pub checkin_url: String,
}

/// GET /api/admin/events/{id}/link
pub async fn checkin_link(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<CheckinLink> {
    let event = db::events::get_event(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::event_not_found(id))?;
    Ok(Json(CheckinLink {
        event_id: event.id,
        checkin_url: state.checkin_url(&event.page_id),
        page_id: event.page_id,
    }))
}
