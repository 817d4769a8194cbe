//! Domain engines
//!
//! Engines are generic over narrow store traits so they run unchanged against
//! PostgreSQL ([`crate::db::PgStore`]) and the in-memory store used in tests.

pub mod checkin;
pub mod events;

#[cfg(test)]
pub mod memory;

use std::collections::HashSet;

use async_trait::async_trait;
use shared::models::{Event, EventFields, EventFilter, EventListing, Member};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Storage operations used by the check-in engine
#[async_trait]
pub trait CheckinStore: Send + Sync {
    async fn find_member(&self, member_id: &str) -> Result<Option<Member>, BoxError>;

    async fn find_event(&self, event_id: i64) -> Result<Option<Event>, BoxError>;

    async fn checkin_exists(&self, event_id: i64, member_id: &str) -> Result<bool, BoxError>;

    /// Insert one check-in. `Ok(false)` when the (event, member) pair already exists.
    async fn insert_checkin(
        &self,
        event_id: i64,
        member_id: &str,
        feedback: Option<&str>,
        now: i64,
    ) -> Result<bool, BoxError>;

    async fn touch_member(&self, member_id: &str, now: i64) -> Result<(), BoxError>;

    /// Subset of `member_ids` that exist
    async fn existing_member_ids(&self, member_ids: &[String]) -> Result<HashSet<String>, BoxError>;

    /// Insert many check-ins, skipping existing pairs and unknown members.
    /// Returns the number of rows inserted.
    async fn insert_checkins(
        &self,
        event_id: i64,
        member_ids: &[String],
        now: i64,
    ) -> Result<u64, BoxError>;
}

/// Storage operations used by the event query engine
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Events matching `filter` with their check-in counts, unordered
    async fn list_events(
        &self,
        filter: &EventFilter,
        end_bound: Option<i64>,
    ) -> Result<Vec<EventListing>, BoxError>;

    /// `(event_end, checkin_count)` of every event ending at or after `end_bound`
    async fn checkin_totals(&self, end_bound: i64) -> Result<Vec<(i64, i64)>, BoxError>;

    /// Insert an event. `Ok(None)` when `id` or `page_id` is already taken.
    async fn insert_event(
        &self,
        id: i64,
        page_id: &str,
        fields: &EventFields,
    ) -> Result<Option<Event>, BoxError>;
}
