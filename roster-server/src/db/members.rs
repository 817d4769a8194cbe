//! Member database operations

use std::collections::HashSet;

use shared::models::{Member, MemberCreate, MemberUpdate, PointsSummary, to_storage_record};
use sqlx::PgPool;

use super::BoxError;
use super::member_data::upsert_member_data;

const MEMBER_COLUMNS: &str = "id, name, email, joined_at, last_seen, extended_data";

pub async fn get_member(pool: &PgPool, id: &str) -> Result<Option<Member>, BoxError> {
    let row: Option<Member> =
        sqlx::query_as(&format!("SELECT {MEMBER_COLUMNS} FROM members WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

pub async fn list_members(pool: &PgPool) -> Result<Vec<Member>, BoxError> {
    let rows: Vec<Member> =
        sqlx::query_as(&format!("SELECT {MEMBER_COLUMNS} FROM members ORDER BY name, id"))
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

/// Insert a member and, when supplied, its profile in one transaction.
pub async fn create_member(
    pool: &PgPool,
    data: &MemberCreate,
    now: i64,
) -> Result<Member, BoxError> {
    let mut tx = pool.begin().await?;

    let member: Member = sqlx::query_as(&format!(
        r#"
        INSERT INTO members (id, name, email, joined_at, last_seen, extended_data)
        VALUES ($1, $2, $3, $4, NULL, $5)
        RETURNING {MEMBER_COLUMNS}
        "#
    ))
    .bind(&data.id)
    .bind(&data.name)
    .bind(&data.email)
    .bind(now)
    .bind(data.extended_data.as_deref().unwrap_or_default())
    .fetch_one(&mut *tx)
    .await?;

    if let Some(profile) = &data.data {
        upsert_member_data(&mut *tx, &member.id, &to_storage_record(profile)).await?;
    }

    tx.commit().await?;
    Ok(member)
}

/// Partial update; absent fields keep their stored values.
pub async fn update_member(
    pool: &PgPool,
    id: &str,
    data: &MemberUpdate,
) -> Result<Option<Member>, BoxError> {
    let mut tx = pool.begin().await?;

    let member: Option<Member> = sqlx::query_as(&format!(
        r#"
        UPDATE members
        SET name = COALESCE($2, name),
            email = COALESCE($3, email),
            extended_data = COALESCE($4, extended_data)
        WHERE id = $1
        RETURNING {MEMBER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.extended_data)
    .fetch_optional(&mut *tx)
    .await?;

    if member.is_some()
        && let Some(profile) = &data.data
    {
        upsert_member_data(&mut *tx, id, &to_storage_record(profile)).await?;
    }

    tx.commit().await?;
    Ok(member)
}

/// Delete a member; profile and check-ins cascade.
pub async fn delete_member(pool: &PgPool, id: &str) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM members WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn touch_member(pool: &PgPool, id: &str, now: i64) -> Result<(), BoxError> {
    sqlx::query("UPDATE members SET last_seen = $2 WHERE id = $1")
        .bind(id)
        .bind(now)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn existing_member_ids(
    pool: &PgPool,
    ids: &[String],
) -> Result<HashSet<String>, BoxError> {
    let rows: Vec<(String,)> = sqlx::query_as("SELECT id FROM members WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Points from attended events, optionally limited to one semester
pub async fn member_points(
    pool: &PgPool,
    member_id: &str,
    semester: Option<&str>,
) -> Result<PointsSummary, BoxError> {
    let (points, events_attended): (i64, i64) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(e.points), 0)::BIGINT, COUNT(*)
        FROM checkins c
        JOIN events e ON e.id = c.event_id
        WHERE c.member_id = $1
          AND ($2::TEXT IS NULL OR e.semester = $2)
        "#,
    )
    .bind(member_id)
    .bind(semester)
    .fetch_one(pool)
    .await?;

    Ok(PointsSummary {
        member_id: member_id.to_string(),
        semester: semester.map(str::to_string),
        points,
        events_attended,
    })
}
