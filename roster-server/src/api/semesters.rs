//! Semester label listing

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::Datelike;
use serde::Deserialize;
use shared::error::AppError;
use shared::models::{MAX_SEMESTER_SPAN_YEARS, Semester, semester_range};
use shared::util::now_millis;

use super::ApiResult;
use crate::state::AppState;
use crate::time::{local_date, semester_at};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/semesters", get(list_semesters))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SemesterQuery {
    /// First semester label, defaults to the current semester
    pub from: Option<String>,
    /// Last calendar year, defaults to the current year
    pub to: Option<i32>,
    pub summer: bool,
}

/// GET /api/semesters?from=Fall%202022&to=2025&summer=false
pub async fn list_semesters(
    State(state): State<AppState>,
    Query(query): Query<SemesterQuery>,
) -> ApiResult<Vec<String>> {
    let now = now_millis();
    let start = match query.from.as_deref().map(str::trim) {
        Some(label) if !label.is_empty() => label.parse::<Semester>()?,
        _ => semester_at(now, state.org_timezone),
    };
    let end_year = query
        .to
        .unwrap_or_else(|| local_date(now, state.org_timezone).year());
    if i64::from(end_year) - i64::from(start.year) > i64::from(MAX_SEMESTER_SPAN_YEARS) {
        return Err(AppError::validation(format!(
            "to may be at most {MAX_SEMESTER_SPAN_YEARS} years after from"
        ))
        .with_detail("to", end_year)
        .into());
    }
    Ok(Json(semester_range(start, end_year, query.summer)))
}
