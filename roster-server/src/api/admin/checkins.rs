//! Check-in administration and attendance statistics

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{
    BulkCheckinRequest, BulkCheckinResult, Checkin, WeeklyCheckins, parse_member_id,
};
use shared::util::now_millis;

use crate::api::ApiResult;
use crate::auth::AdminCapability;
use crate::db;
use crate::error::ServiceError;
use crate::services::checkin::bulk_create_checkins;
use crate::services::events::get_grouped_checkins;
use crate::state::AppState;
use crate::time::parse_date;

/// GET /api/admin/events/{id}/checkins
pub async fn list_checkins(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<Vec<Checkin>> {
    if db::events::get_event(&state.pool, event_id).await?.is_none() {
        return Err(AppError::event_not_found(event_id).into());
    }
    let checkins = db::checkins::list_event_checkins(&state.pool, event_id).await?;
    Ok(Json(checkins))
}

/// POST /api/admin/events/{id}/checkins/bulk
pub async fn bulk_checkins(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminCapability>,
    Path(event_id): Path<i64>,
    Json(req): Json<BulkCheckinRequest>,
) -> ApiResult<BulkCheckinResult> {
    let result =
        bulk_create_checkins(&admin, &state.store(), event_id, &req.member_ids, now_millis())
            .await?;
    Ok(Json(result))
}

/// DELETE /api/admin/events/{id}/checkins/{member_id}
pub async fn delete_checkin(
    State(state): State<AppState>,
    Path((event_id, member_id)): Path<(i64, String)>,
) -> Result<ApiResponse<()>, ServiceError> {
    let member_id = parse_member_id(&member_id)?;
    if !db::checkins::delete_checkin(&state.pool, event_id, &member_id).await? {
        return Err(AppError::new(ErrorCode::CheckinNotFound)
            .with_detail("event_id", event_id)
            .with_detail("member_id", member_id)
            .into());
    }
    tracing::info!(event_id, %member_id, "Check-in removed");
    Ok(ApiResponse::ok())
}

#[derive(Debug, Deserialize)]
pub struct WeeklyQuery {
    /// `YYYY-MM-DD`
    pub start: String,
}

/// GET /api/admin/checkins/weekly?start=YYYY-MM-DD
pub async fn weekly(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminCapability>,
    Query(query): Query<WeeklyQuery>,
) -> ApiResult<Vec<WeeklyCheckins>> {
    let start = parse_date(&query.start)?;
    let weeks = get_grouped_checkins(
        &admin,
        &state.store(),
        start,
        now_millis(),
        state.org_timezone,
    )
    .await?;
    Ok(Json(weeks))
}
