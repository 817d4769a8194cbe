//! In-memory store for engine tests
//!
//! Enforces the same uniqueness rules as the PostgreSQL schema: one check-in
//! per (event, member), unique event page ids, check-ins only for existing
//! members and events.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use shared::models::{Checkin, Event, EventFields, EventFilter, EventListing, Member};

use super::{BoxError, CheckinStore, EventStore};

#[derive(Default)]
struct Tables {
    members: HashMap<String, Member>,
    events: HashMap<i64, Event>,
    checkins: HashMap<(i64, String), Checkin>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    /// Make `checkin_exists` always answer `false`, so duplicates reach the insert
    skip_precheck: AtomicBool,
    /// Make `touch_member` return an error
    fail_touch: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip_precheck(&self) {
        self.skip_precheck.store(true, Ordering::SeqCst);
    }

    pub fn fail_touch(&self) {
        self.fail_touch.store(true, Ordering::SeqCst);
    }

    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_member(&self, id: &str) -> Member {
        let member = Member {
            id: id.to_string(),
            name: format!("Member {id}"),
            email: format!("{id}@example.edu"),
            joined_at: 0,
            last_seen: None,
            extended_data: String::new(),
        };
        self.tables().members.insert(id.to_string(), member.clone());
        member
    }

    pub fn add_event(&self, event: Event) {
        self.tables().events.insert(event.id, event);
    }

    pub fn member(&self, id: &str) -> Option<Member> {
        self.tables().members.get(id).cloned()
    }

    pub fn checkins(&self, event_id: i64) -> Vec<Checkin> {
        let mut rows: Vec<_> = self
            .tables()
            .checkins
            .values()
            .filter(|c| c.event_id == event_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.member_id.cmp(&b.member_id));
        rows
    }

    pub fn checkin_count(&self) -> usize {
        self.tables().checkins.len()
    }

    fn count_for(tables: &Tables, event_id: i64) -> i64 {
        tables
            .checkins
            .keys()
            .filter(|(e, _)| *e == event_id)
            .count() as i64
    }
}

#[async_trait]
impl CheckinStore for MemoryStore {
    async fn find_member(&self, member_id: &str) -> Result<Option<Member>, BoxError> {
        Ok(self.member(member_id))
    }

    async fn find_event(&self, event_id: i64) -> Result<Option<Event>, BoxError> {
        Ok(self.tables().events.get(&event_id).cloned())
    }

    async fn checkin_exists(&self, event_id: i64, member_id: &str) -> Result<bool, BoxError> {
        if self.skip_precheck.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(self
            .tables()
            .checkins
            .contains_key(&(event_id, member_id.to_string())))
    }

    async fn insert_checkin(
        &self,
        event_id: i64,
        member_id: &str,
        feedback: Option<&str>,
        now: i64,
    ) -> Result<bool, BoxError> {
        // Give racing submissions a chance to interleave between pre-check and insert
        tokio::task::yield_now().await;

        let mut tables = self.tables();
        if !tables.events.contains_key(&event_id) || !tables.members.contains_key(member_id) {
            return Err("foreign key violation".into());
        }
        let key = (event_id, member_id.to_string());
        if tables.checkins.contains_key(&key) {
            return Ok(false);
        }
        tables.checkins.insert(
            key,
            Checkin {
                event_id,
                member_id: member_id.to_string(),
                created_at: now,
                is_in_person: true,
                feedback: feedback.map(str::to_string),
            },
        );
        Ok(true)
    }

    async fn touch_member(&self, member_id: &str, now: i64) -> Result<(), BoxError> {
        if self.fail_touch.load(Ordering::SeqCst) {
            return Err("last_seen update failed".into());
        }
        if let Some(member) = self.tables().members.get_mut(member_id) {
            member.last_seen = Some(now);
        }
        Ok(())
    }

    async fn existing_member_ids(
        &self,
        member_ids: &[String],
    ) -> Result<HashSet<String>, BoxError> {
        let tables = self.tables();
        Ok(member_ids
            .iter()
            .filter(|id| tables.members.contains_key(*id))
            .cloned()
            .collect())
    }

    async fn insert_checkins(
        &self,
        event_id: i64,
        member_ids: &[String],
        now: i64,
    ) -> Result<u64, BoxError> {
        let mut tables = self.tables();
        if !tables.events.contains_key(&event_id) {
            return Err("foreign key violation".into());
        }
        let mut inserted = 0;
        for id in member_ids {
            if !tables.members.contains_key(id) {
                continue;
            }
            let key = (event_id, id.clone());
            if tables.checkins.contains_key(&key) {
                continue;
            }
            tables.checkins.insert(
                key,
                Checkin {
                    event_id,
                    member_id: id.clone(),
                    created_at: now,
                    is_in_person: true,
                    feedback: None,
                },
            );
            inserted += 1;
        }
        Ok(inserted)
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn list_events(
        &self,
        filter: &EventFilter,
        end_bound: Option<i64>,
    ) -> Result<Vec<EventListing>, BoxError> {
        let tables = self.tables();
        Ok(tables
            .events
            .values()
            .filter(|e| filter.matches(e, end_bound))
            .map(|e| EventListing {
                event: e.clone(),
                checkin_count: Self::count_for(&tables, e.id),
            })
            .collect())
    }

    async fn checkin_totals(&self, end_bound: i64) -> Result<Vec<(i64, i64)>, BoxError> {
        let tables = self.tables();
        Ok(tables
            .events
            .values()
            .filter(|e| e.event_end >= end_bound)
            .map(|e| (e.event_end, Self::count_for(&tables, e.id)))
            .collect())
    }

    async fn insert_event(
        &self,
        id: i64,
        page_id: &str,
        fields: &EventFields,
    ) -> Result<Option<Event>, BoxError> {
        let mut tables = self.tables();
        if tables.events.contains_key(&id)
            || tables.events.values().any(|e| e.page_id == page_id)
        {
            return Ok(None);
        }
        let event = Event {
            id,
            page_id: page_id.to_string(),
            name: fields.name.clone(),
            description: fields.description.clone(),
            header_image: fields.header_image.clone(),
            organization: fields.organization,
            semester: fields.semester.clone(),
            location: fields.location.clone(),
            event_start: fields.event_start,
            event_end: fields.event_end,
            form_open: fields.form_open,
            form_close: fields.form_close,
            forced_is_open: fields.forced_is_open,
            points: fields.points,
        };
        tables.events.insert(id, event.clone());
        Ok(Some(event))
    }
}
