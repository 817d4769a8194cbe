//! Admin API, gated by the admin cookie middleware

mod checkins;
mod events;
mod members;

use axum::Router;
use axum::routing::{delete, get, post};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/members", get(members::list_members))
        .route(
            "/api/admin/members/{id}",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
        .route("/api/admin/events", post(events::create_event))
        .route(
            "/api/admin/events/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/api/admin/events/{id}/link", get(events::checkin_link))
        .route(
            "/api/admin/events/{id}/checkins",
            get(checkins::list_checkins),
        )
        .route(
            "/api/admin/events/{id}/checkins/bulk",
            post(checkins::bulk_checkins),
        )
        .route(
            "/api/admin/events/{id}/checkins/{member_id}",
            delete(checkins::delete_checkin),
        )
        .route("/api/admin/checkins/weekly", get(checkins::weekly))
}
