//! Machine-facing REST endpoints; credentials travel in the request body

use axum::{Json, Router, extract::State, routing::post};
use shared::error::AppError;
use shared::models::{BulkCheckinResult, RestBulkCheckinRequest};
use shared::util::now_millis;

use super::ApiResult;
use crate::services::checkin::bulk_create_checkins;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/rest/checkins/bulk", post(bulk_checkins))
}

/// POST /api/rest/checkins/bulk
pub async fn bulk_checkins(
    State(state): State<AppState>,
    Json(req): Json<RestBulkCheckinRequest>,
) -> ApiResult<BulkCheckinResult> {
    let admin = state
        .admin
        .authorize(&req.username, &req.password)
        .ok_or_else(AppError::invalid_credentials)?;

    let result = bulk_create_checkins(
        &admin,
        &state.store(),
        req.event_id,
        &req.member_ids,
        now_millis(),
    )
    .await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use serde_json::json;

    use crate::api::test_support::*;

    #[tokio::test]
    async fn body_credentials_are_checked() {
        let response = send(json(
            "POST",
            "/api/rest/checkins/bulk",
            json!({
                "username": "admin",
                "password": "wrong",
                "event_id": 1,
                "member_ids": ["abc123"],
            }),
        ))
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
