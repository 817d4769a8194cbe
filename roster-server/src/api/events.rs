//! Public event listing, event pages and self-service check-in

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::header::CACHE_CONTROL,
    response::IntoResponse,
    routing::{get, post},
};
use shared::error::AppError;
use shared::models::{
    CheckinReceipt, CheckinRequest, CheckinStatus, Event, EventFilter, EventListing, EventPage,
    EventQuery, normalize_member_id,
};
use shared::util::now_millis;

use super::ApiResult;
use crate::db;
use crate::error::{ServiceError, ServiceResult};
use crate::services::checkin::{CheckinError, submit_checkin};
use crate::services::events::get_events;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(list_events))
        .route("/api/events/{page_id}", get(get_event_page))
        .route("/api/events/{page_id}/checkin", post(checkin))
}

async fn event_by_page(state: &AppState, page_id: &str) -> ServiceResult<Event> {
    db::events::get_event_by_page_id(&state.pool, page_id)
        .await?
        .ok_or_else(|| AppError::event_not_found(page_id).into())
}

/// GET /api/events?past=&sort=&organizations=&semesters=
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> ApiResult<Vec<EventListing>> {
    let filter = EventFilter::try_from(query)?;
    let listings = get_events(&state.store(), &filter, now_millis(), state.org_timezone).await?;
    Ok(Json(listings))
}

/// GET /api/events/{page_id}
pub async fn get_event_page(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let event = event_by_page(&state, &page_id).await?;
    let page = EventPage {
        admission_open: event.is_admission_open(now_millis(), state.admission_window),
        checkin_url: state.checkin_url(&event.page_id),
        event,
    };
    let cache = format!("public, max-age={}", state.event_revalidate_secs);
    Ok(([(CACHE_CONTROL, cache)], Json(page)))
}

/// POST /api/events/{page_id}/checkin
///
/// A repeated check-in is reported as `already_checked_in` with HTTP 200.
pub async fn checkin(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
    Json(mut req): Json<CheckinRequest>,
) -> ApiResult<CheckinReceipt> {
    req.normalize()?;
    let event = event_by_page(&state, &page_id).await?;

    let result = submit_checkin(
        &state.store(),
        event.id,
        &req.member_id,
        req.feedback.as_deref(),
        now_millis(),
        state.admission_window,
    )
    .await;

    let receipt = match result {
        Ok(checkin) => CheckinReceipt {
            status: CheckinStatus::CheckedIn,
            event_id: event.id,
            member_id: checkin.member_id.clone(),
            checkin: Some(checkin),
        },
        Err(CheckinError::AlreadyCheckedIn) => CheckinReceipt {
            status: CheckinStatus::AlreadyCheckedIn,
            event_id: event.id,
            member_id: normalize_member_id(&req.member_id),
            checkin: None,
        },
        Err(e) => {
            tracing::debug!(%page_id, error = %e, "Check-in rejected");
            return Err(e.into());
        }
    };
    Ok(Json(receipt))
}
