//! Event database operations

use shared::models::{Event, EventFields, EventFilter, EventListing, FlagTag};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{BoxError, unique_violation};

const EVENT_COLUMNS: &str = "id, page_id, name, description, header_image, organization, \
    semester, location, event_start, event_end, form_open, form_close, forced_is_open, points";

const EVENT_COLUMNS_E: &str = "e.id, e.page_id, e.name, e.description, e.header_image, \
    e.organization, e.semester, e.location, e.event_start, e.event_end, e.form_open, \
    e.form_close, e.forced_is_open, e.points";

pub async fn get_event(pool: &PgPool, id: i64) -> Result<Option<Event>, BoxError> {
    let row: Option<Event> =
        sqlx::query_as(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

pub async fn get_event_by_page_id(pool: &PgPool, page_id: &str) -> Result<Option<Event>, BoxError> {
    let row: Option<Event> =
        sqlx::query_as(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE page_id = $1"))
            .bind(page_id)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

/// Events matching the filter with their check-in counts (unsorted).
pub async fn list_events_with_counts(
    pool: &PgPool,
    filter: &EventFilter,
    end_bound: Option<i64>,
) -> Result<Vec<EventListing>, BoxError> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "SELECT {EVENT_COLUMNS_E}, COUNT(c.member_id) AS checkin_count \
         FROM events e LEFT JOIN checkins c ON c.event_id = e.id WHERE TRUE"
    ));

    if let Some(bound) = end_bound {
        qb.push(" AND e.event_end >= ").push_bind(bound);
    }
    if !filter.organizations.is_empty() {
        let tags: Vec<String> = filter
            .organizations
            .iter()
            .map(|o| o.tag().to_string())
            .collect();
        qb.push(" AND e.organization = ANY(").push_bind(tags).push(")");
    }
    if !filter.semesters.is_empty() {
        let semesters: Vec<String> = filter.semesters.iter().cloned().collect();
        qb.push(" AND e.semester = ANY(").push_bind(semesters).push(")");
    }
    qb.push(" GROUP BY e.id");

    let rows: Vec<EventListing> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows)
}

/// `(event_end, checkin_count)` for events ending at or after `end_bound`
pub async fn checkin_totals(pool: &PgPool, end_bound: i64) -> Result<Vec<(i64, i64)>, BoxError> {
    let rows: Vec<(i64, i64)> = sqlx::query_as(
        r#"
        SELECT e.event_end, COUNT(c.member_id)
        FROM events e
        LEFT JOIN checkins c ON c.event_id = e.id
        WHERE e.event_end >= $1
        GROUP BY e.id, e.event_end
        "#,
    )
    .bind(end_bound)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Insert an event. Returns `None` when the id or page id is already taken.
pub async fn insert_event(
    pool: &PgPool,
    id: i64,
    page_id: &str,
    fields: &EventFields,
) -> Result<Option<Event>, BoxError> {
    let result: Result<Event, BoxError> = sqlx::query_as(&format!(
        r#"
        INSERT INTO events (id, page_id, name, description, header_image, organization,
                            semester, location, event_start, event_end, form_open, form_close,
                            forced_is_open, points)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING {EVENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(page_id)
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(&fields.header_image)
    .bind(fields.organization.tag())
    .bind(&fields.semester)
    .bind(&fields.location)
    .bind(fields.event_start)
    .bind(fields.event_end)
    .bind(fields.form_open)
    .bind(fields.form_close)
    .bind(fields.forced_is_open)
    .bind(fields.points)
    .fetch_one(pool)
    .await
    .map_err(Into::into);

    match result {
        Ok(event) => Ok(Some(event)),
        Err(e) if unique_violation(&e).is_some() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Replace every editable field; `id` and `page_id` never change.
pub async fn update_event(
    pool: &PgPool,
    id: i64,
    fields: &EventFields,
) -> Result<Option<Event>, BoxError> {
    let row: Option<Event> = sqlx::query_as(&format!(
        r#"
        UPDATE events
        SET name = $2, description = $3, header_image = $4, organization = $5,
            semester = $6, location = $7, event_start = $8, event_end = $9,
            form_open = $10, form_close = $11, forced_is_open = $12, points = $13
        WHERE id = $1
        RETURNING {EVENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(&fields.header_image)
    .bind(fields.organization.tag())
    .bind(&fields.semester)
    .bind(&fields.location)
    .bind(fields.event_start)
    .bind(fields.event_end)
    .bind(fields.form_open)
    .bind(fields.form_close)
    .bind(fields.forced_is_open)
    .bind(fields.points)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Delete an event; its check-ins cascade.
pub async fn delete_event(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
