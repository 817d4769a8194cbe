//! Event query engine and derived statistics

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use chrono_tz::Tz;
use shared::error::{AppError, ErrorCode};
use shared::models::{Event, EventFields, EventFilter, EventListing, WeeklyCheckins};
use shared::util::{random_page_id, snowflake_id};

use super::{BoxError, EventStore};
use crate::auth::AdminCapability;
use crate::error::{ServiceError, ServiceResult};
use crate::time::{day_start_millis, local_date};

/// Page id collisions tolerated before giving up
const PAGE_ID_ATTEMPTS: usize = 8;

/// Events matching `filter`, sorted as requested. Always re-queries the store.
pub async fn get_events<S: EventStore + ?Sized>(
    store: &S,
    filter: &EventFilter,
    now: i64,
    tz: Tz,
) -> Result<Vec<EventListing>, BoxError> {
    let end_bound = filter.end_bound(now, |date| day_start_millis(date, tz));
    let mut listings = store.list_events(filter, end_bound).await?;
    filter.sort.apply(&mut listings);
    Ok(listings)
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let weekday = date.weekday().num_days_from_sunday();
    date - Days::new(u64::from((weekday + 6) % 7))
}

/// Weekly check-in totals for events ending on/after `start`.
pub async fn get_grouped_checkins<S: EventStore + ?Sized>(
    _admin: &AdminCapability,
    store: &S,
    start: NaiveDate,
    now: i64,
    tz: Tz,
) -> Result<Vec<WeeklyCheckins>, BoxError> {
    let totals = store.checkin_totals(day_start_millis(start, tz)).await?;
    let buckets = totals
        .into_iter()
        .map(|(event_end, count)| (local_date(event_end, tz), count));
    Ok(group_by_week(start, local_date(now, tz), buckets))
}

/// Sum `(date, count)` pairs into consecutive Monday-based weeks.
///
/// The range runs from the week of `start` through the week of `today`, and
/// further if a bucket falls after that, so every count lands in some week.
pub fn group_by_week(
    start: NaiveDate,
    today: NaiveDate,
    buckets: impl IntoIterator<Item = (NaiveDate, i64)>,
) -> Vec<WeeklyCheckins> {
    let first = week_start(start);
    let mut totals: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for (date, count) in buckets {
        *totals.entry(week_start(date)).or_default() += count;
    }

    let mut last = week_start(today);
    if let Some((&latest, _)) = totals.last_key_value() {
        last = last.max(latest);
    }

    let mut weeks = Vec::new();
    let mut week = first;
    while week <= last {
        weeks.push(WeeklyCheckins {
            week: format!("{}/{}", week.month(), week.day()),
            week_start: week,
            count: totals.get(&week).copied().unwrap_or(0),
        });
        match week.checked_add_days(Days::new(7)) {
            Some(next) => week = next,
            None => break,
        }
    }
    weeks
}

/// Insert an event under a fresh random page id.
pub async fn create_event<S: EventStore + ?Sized>(
    store: &S,
    fields: &EventFields,
) -> ServiceResult<Event> {
    create_event_with(store, fields, random_page_id).await
}

async fn create_event_with<S: EventStore + ?Sized>(
    store: &S,
    fields: &EventFields,
    mut next_page_id: impl FnMut() -> String + Send,
) -> ServiceResult<Event> {
    for _ in 0..PAGE_ID_ATTEMPTS {
        let page_id = next_page_id();
        if let Some(event) = store.insert_event(snowflake_id(), &page_id, fields).await? {
            tracing::info!(event_id = event.id, page_id = %event.page_id, "Event created");
            return Ok(event);
        }
        tracing::debug!(%page_id, "Page id collision, retrying");
    }
    Err(ServiceError::App(AppError::new(ErrorCode::PageIdExhausted)))
}
