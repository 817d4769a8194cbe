//! Database access layer

pub mod checkins;
pub mod events;
pub mod member_data;
pub mod members;

use std::collections::HashSet;

use async_trait::async_trait;
use shared::models::{Event, EventFields, EventFilter, EventListing, Member};
use sqlx::PgPool;

use crate::services::{CheckinStore, EventStore};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Name of the violated unique constraint, if `err` is a unique violation.
///
/// Returns an empty string when the driver does not report the name.
/// Callers match on PostgreSQL's default constraint names from
/// `migrations/0001_initial.sql` (`members_pkey`, `members_email_key`, see
/// `api::members::member_conflict`), so those tables must keep implicit names.
pub fn unique_violation(err: &BoxError) -> Option<&str> {
    let db_err = err.downcast_ref::<sqlx::Error>()?.as_database_error()?;
    db_err
        .is_unique_violation()
        .then(|| db_err.constraint().unwrap_or_default())
}

/// [`CheckinStore`]/[`EventStore`] backed by PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckinStore for PgStore {
    async fn find_member(&self, member_id: &str) -> Result<Option<Member>, BoxError> {
        members::get_member(&self.pool, member_id).await
    }

    async fn find_event(&self, event_id: i64) -> Result<Option<Event>, BoxError> {
        events::get_event(&self.pool, event_id).await
    }

    async fn checkin_exists(&self, event_id: i64, member_id: &str) -> Result<bool, BoxError> {
        checkins::checkin_exists(&self.pool, event_id, member_id).await
    }

    async fn insert_checkin(
        &self,
        event_id: i64,
        member_id: &str,
        feedback: Option<&str>,
        now: i64,
    ) -> Result<bool, BoxError> {
        checkins::insert_checkin(&self.pool, event_id, member_id, feedback, now).await
    }

    async fn touch_member(&self, member_id: &str, now: i64) -> Result<(), BoxError> {
        members::touch_member(&self.pool, member_id, now).await
    }

    async fn existing_member_ids(
        &self,
        member_ids: &[String],
    ) -> Result<HashSet<String>, BoxError> {
        members::existing_member_ids(&self.pool, member_ids).await
    }

    async fn insert_checkins(
        &self,
        event_id: i64,
        member_ids: &[String],
        now: i64,
    ) -> Result<u64, BoxError> {
        checkins::insert_checkins(&self.pool, event_id, member_ids, now).await
    }
}

#[async_trait]
impl EventStore for PgStore {
    async fn list_events(
        &self,
        filter: &EventFilter,
        end_bound: Option<i64>,
    ) -> Result<Vec<EventListing>, BoxError> {
        events::list_events_with_counts(&self.pool, filter, end_bound).await
    }

    async fn checkin_totals(&self, end_bound: i64) -> Result<Vec<(i64, i64)>, BoxError> {
        events::checkin_totals(&self.pool, end_bound).await
    }

    async fn insert_event(
        &self,
        id: i64,
        page_id: &str,
        fields: &EventFields,
    ) -> Result<Option<Event>, BoxError> {
        events::insert_event(&self.pool, id, page_id, fields).await
    }
}
