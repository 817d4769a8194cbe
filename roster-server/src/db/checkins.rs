//! Check-in database operations
//!
//! The `(event_id, member_id)` primary key is the only thing that serializes
//! concurrent check-ins.

use shared::models::Checkin;
use sqlx::PgPool;

use super::{BoxError, unique_violation};

const CHECKIN_COLUMNS: &str = "event_id, member_id, created_at, is_in_person, feedback";

pub async fn checkin_exists(
    pool: &PgPool,
    event_id: i64,
    member_id: &str,
) -> Result<bool, BoxError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM checkins WHERE event_id = $1 AND member_id = $2)",
    )
    .bind(event_id)
    .bind(member_id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

/// Insert one in-person check-in. `Ok(false)` on a duplicate pair.
pub async fn insert_checkin(
    pool: &PgPool,
    event_id: i64,
    member_id: &str,
    feedback: Option<&str>,
    now: i64,
) -> Result<bool, BoxError> {
    let result = sqlx::query(
        r#"
        INSERT INTO checkins (event_id, member_id, created_at, is_in_person, feedback)
        VALUES ($1, $2, $3, TRUE, $4)
        "#,
    )
    .bind(event_id)
    .bind(member_id)
    .bind(now)
    .bind(feedback)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(true),
        Err(e) => {
            let e: BoxError = e.into();
            if unique_violation(&e).is_some() {
                Ok(false)
            } else {
                Err(e)
            }
        }
    }
}

/// Insert many check-ins in one statement, skipping existing pairs and ids
/// without a member row. Returns the number of rows inserted.
pub async fn insert_checkins(
    pool: &PgPool,
    event_id: i64,
    member_ids: &[String],
    now: i64,
) -> Result<u64, BoxError> {
    let result = sqlx::query(
        r#"
        INSERT INTO checkins (event_id, member_id, created_at, is_in_person)
        SELECT $1, m.id, $3, TRUE
        FROM unnest($2::TEXT[]) AS u(id)
        JOIN members m ON m.id = u.id
        ON CONFLICT (event_id, member_id) DO NOTHING
        "#,
    )
    .bind(event_id)
    .bind(member_ids)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn list_event_checkins(pool: &PgPool, event_id: i64) -> Result<Vec<Checkin>, BoxError> {
    let rows: Vec<Checkin> = sqlx::query_as(&format!(
        "SELECT {CHECKIN_COLUMNS} FROM checkins WHERE event_id = $1 ORDER BY created_at, member_id"
    ))
    .bind(event_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_member_checkins(
    pool: &PgPool,
    member_id: &str,
) -> Result<Vec<Checkin>, BoxError> {
    let rows: Vec<Checkin> = sqlx::query_as(&format!(
        "SELECT {CHECKIN_COLUMNS} FROM checkins WHERE member_id = $1 ORDER BY created_at DESC"
    ))
    .bind(member_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn delete_checkin(
    pool: &PgPool,
    event_id: i64,
    member_id: &str,
) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM checkins WHERE event_id = $1 AND member_id = $2")
        .bind(event_id)
        .bind(member_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
