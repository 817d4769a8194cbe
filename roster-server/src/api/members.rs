//! Public member endpoints: registration, self-service profile, points

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Member, MemberCreate, MemberProfile, PointsSummary, ProfileUpdate, Semester,
    parse_member_id, to_pretty_record, to_storage_record,
};
use shared::util::now_millis;

use super::ApiResult;
use crate::db::{self, BoxError, unique_violation};
use crate::error::ServiceError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/members", post(register))
        .route("/api/members/{id}/profile", put(update_profile))
        .route("/api/members/{id}/points", get(points))
}

/// Map a duplicate id/email insert to its conflict code.
///
/// Constraint names are the PostgreSQL defaults for the `members` table in
/// `migrations/0001_initial.sql`; renaming either constraint there breaks this.
pub(crate) fn member_conflict(err: BoxError) -> ServiceError {
    let app_err = unique_violation(&err).map(|constraint| match constraint {
        "members_pkey" => AppError::new(ErrorCode::MemberIdExists),
        "members_email_key" => AppError::new(ErrorCode::MemberEmailExists),
        "" => AppError::new(ErrorCode::AlreadyExists),
        other => AppError::conflict(format!("Duplicate value violates {other}"))
            .with_detail("constraint", other),
    });
    match app_err {
        Some(app_err) => ServiceError::App(app_err),
        None => ServiceError::Db(err),
    }
}

/// POST /api/members
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<MemberCreate>,
) -> ApiResult<Member> {
    payload.normalize()?;
    let member = db::members::create_member(&state.pool, &payload, now_millis())
        .await
        .map_err(member_conflict)?;
    tracing::info!(member_id = %member.id, "Member registered");
    Ok(Json(member))
}

/// PUT /api/members/{id}/profile
///
/// The caller proves ownership by supplying the email on record.
pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProfileUpdate>,
) -> ApiResult<MemberProfile> {
    let id = parse_member_id(&id)?;
    payload.data.validate()?;

    let member = db::members::get_member(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::member_not_found(&id))?;
    if !member.email.eq_ignore_ascii_case(payload.email.trim()) {
        return Err(AppError::new(ErrorCode::MemberEmailMismatch).into());
    }

    db::member_data::upsert_member_data(&state.pool, &id, &to_storage_record(&payload.data))
        .await?;
    let record = db::member_data::get_member_data(&state.pool, &id)
        .await?
        .unwrap_or_default();
    Ok(Json(to_pretty_record(&record)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PointsQuery {
    pub semester: Option<String>,
}

/// GET /api/members/{id}/points?semester=
pub async fn points(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PointsQuery>,
) -> ApiResult<PointsSummary> {
    let id = parse_member_id(&id)?;
    let semester = match query.semester.as_deref().map(str::trim) {
        Some(label) if !label.is_empty() => Some(label.parse::<Semester>()?.to_string()),
        _ => None,
    };

    if db::members::get_member(&state.pool, &id).await?.is_none() {
        return Err(AppError::member_not_found(&id).into());
    }
    let summary = db::members::member_points(&state.pool, &id, semester.as_deref()).await?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use serde_json::json;
    use shared::error::{AppError, ErrorCode};

    use super::member_conflict;
    use crate::api::test_support::*;
    use crate::error::ServiceError;

    #[test]
    fn non_unique_store_errors_stay_database_errors() {
        let err = member_conflict("connection reset by peer".into());
        assert!(matches!(err, ServiceError::Db(_)));
        let app_err = AppError::from(err);
        assert_eq!(app_err.code, ErrorCode::DatabaseError);
        assert_eq!(app_err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn registration_validates_member_id() {
        let response = send(json(
            "POST",
            "/api/members",
            json!({ "id": "12abc3", "name": "Ada", "email": "ada@example.edu" }),
        ))
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], ErrorCode::InvalidMemberId.code());
    }

    #[tokio::test]
    async fn registration_validates_email() {
        let response = send(json(
            "POST",
            "/api/members",
            json!({ "id": "abc123", "name": "Ada", "email": "not-an-email" }),
        ))
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn profile_rejects_bad_member_id() {
        let response = send(json(
            "PUT",
            "/api/members/nope/profile",
            json!({ "email": "ada@example.edu", "data": {} }),
        ))
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn points_rejects_bad_semester() {
        let response = send(get("/api/members/abc123/points?semester=Fall%2024")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], ErrorCode::InvalidSemester.code());
    }
}
