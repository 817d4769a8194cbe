//! Check-in eligibility engine
//!
//! Decides whether a member may check into an event and records the check-in.
//! Concurrent submissions for the same pair are serialized only by the store's
//! unique constraint; the existence pre-check just avoids a doomed insert.

use shared::models::{
    AdmissionWindow, BulkCheckinResult, Checkin, normalize_member_ids, parse_member_id,
};

use super::{BoxError, CheckinStore};
use crate::auth::AdminCapability;

#[derive(Debug, thiserror::Error)]
pub enum CheckinError {
    #[error("invalid member id: {0}")]
    InvalidMemberId(String),
    #[error("member {0} not found")]
    MemberNotFound(String),
    #[error("event {0} not found")]
    EventNotFound(i64),
    #[error("check-in is not currently available")]
    AdmissionWindowClosed,
    #[error("already checked in")]
    AlreadyCheckedIn,
    #[error("store error: {0}")]
    Store(BoxError),
}

impl From<BoxError> for CheckinError {
    fn from(e: BoxError) -> Self {
        CheckinError::Store(e)
    }
}

/// Self-service check-in of `member_id` into `event_id` at `now`.
pub async fn submit_checkin<S: CheckinStore + ?Sized>(
    store: &S,
    event_id: i64,
    member_id: &str,
    feedback: Option<&str>,
    now: i64,
    window: AdmissionWindow,
) -> Result<Checkin, CheckinError> {
    let member_id =
        parse_member_id(member_id).map_err(|_| CheckinError::InvalidMemberId(member_id.into()))?;

    let member = store
        .find_member(&member_id)
        .await?
        .ok_or_else(|| CheckinError::MemberNotFound(member_id.clone()))?;
    let event = store
        .find_event(event_id)
        .await?
        .ok_or(CheckinError::EventNotFound(event_id))?;

    if !event.is_admission_open(now, window) {
        return Err(CheckinError::AdmissionWindowClosed);
    }

    if store.checkin_exists(event.id, &member.id).await? {
        return Err(CheckinError::AlreadyCheckedIn);
    }

    // The unique constraint is authoritative: a lost race surfaces here.
    if !store
        .insert_checkin(event.id, &member.id, feedback, now)
        .await?
    {
        return Err(CheckinError::AlreadyCheckedIn);
    }

    // The check-in is stored at this point; last_seen is best-effort.
    if let Err(e) = store.touch_member(&member.id, now).await {
        tracing::warn!(member_id = %member.id, error = %e, "Failed to update last_seen");
    }

    tracing::info!(event_id = event.id, member_id = %member.id, "Member checked in");

    Ok(Checkin {
        event_id: event.id,
        member_id: member.id,
        created_at: now,
        is_in_person: true,
        feedback: feedback.map(str::to_string),
    })
}

/// Admin import of many check-ins at once.
///
/// Ids are normalized and de-duplicated; existing pairs are skipped, unknown
/// members are skipped and reported. Calling twice with the same ids inserts
/// nothing the second time.
pub async fn bulk_create_checkins<S: CheckinStore + ?Sized>(
    _admin: &AdminCapability,
    store: &S,
    event_id: i64,
    member_ids: &[String],
    now: i64,
) -> Result<BulkCheckinResult, CheckinError> {
    let ids = normalize_member_ids(member_ids);

    if store.find_event(event_id).await?.is_none() {
        return Err(CheckinError::EventNotFound(event_id));
    }
    if ids.is_empty() {
        return Ok(BulkCheckinResult::default());
    }

    let existing = store.existing_member_ids(&ids).await?;
    let unknown_member_ids: Vec<String> = ids
        .iter()
        .filter(|id| !existing.contains(*id))
        .cloned()
        .collect();
    let known: Vec<String> = ids
        .iter()
        .filter(|id| existing.contains(*id))
        .cloned()
        .collect();

    let count = store.insert_checkins(event_id, &known, now).await?;

    if !unknown_member_ids.is_empty() {
        tracing::warn!(
            event_id,
            unknown = ?unknown_member_ids,
            "Bulk check-in skipped unknown members"
        );
    }
    tracing::info!(event_id, count, requested = ids.len(), "Bulk check-in imported");

    Ok(BulkCheckinResult {
        count,
        requested: ids.len(),
        unknown_member_ids,
    })
}
