//! Member administration

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{ApiResponse, AppError};
use shared::models::{Member, MemberDetail, MemberUpdate, parse_member_id, to_pretty_record};

use crate::api::ApiResult;
use crate::api::members::member_conflict;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

/// GET /api/admin/members
pub async fn list_members(State(state): State<AppState>) -> ApiResult<Vec<Member>> {
    let members = db::members::list_members(&state.pool).await?;
    Ok(Json(members))
}

/// GET /api/admin/members/{id}
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MemberDetail> {
    let id = parse_member_id(&id)?;
    let member = db::members::get_member(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::member_not_found(&id))?;
    let profile = db::member_data::get_member_data(&state.pool, &id)
        .await?
        .map(|record| to_pretty_record(&record));
    let checkins = db::checkins::list_member_checkins(&state.pool, &id).await?;

    Ok(Json(MemberDetail {
        member,
        profile,
        checkins,
    }))
}

/// PUT /api/admin/members/{id}
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut payload): Json<MemberUpdate>,
) -> ApiResult<Member> {
    let id = parse_member_id(&id)?;
    payload.normalize()?;
    let member = db::members::update_member(&state.pool, &id, &payload)
        .await
        .map_err(member_conflict)?
        .ok_or_else(|| AppError::member_not_found(&id))?;
    tracing::info!(member_id = %member.id, "Member updated");
    Ok(Json(member))
}

/// DELETE /api/admin/members/{id}
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ServiceError> {
    let id = parse_member_id(&id)?;
    if !db::members::delete_member(&state.pool, &id).await? {
        return Err(AppError::member_not_found(&id).into());
    }
    tracing::info!(member_id = %id, "Member deleted");
    Ok(ApiResponse::ok())
}
