//! Checkin Model

use serde::{Deserialize, Serialize};

use super::member::normalize_member_id;
use crate::error::AppError;
use crate::validation::{MAX_NOTE_LEN, validate_optional_text};

/// A member's attendance record for one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Checkin {
    pub event_id: i64,
    pub member_id: String,
    pub created_at: i64,
    pub is_in_person: bool,
    pub feedback: Option<String>,
}

/// Self-service check-in payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckinRequest {
    pub member_id: String,
    #[serde(default)]
    pub feedback: Option<String>,
}

impl CheckinRequest {
    /// Trim feedback, dropping it when blank.
    pub fn normalize(&mut self) -> Result<(), AppError> {
        self.feedback = self
            .feedback
            .take()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());
        validate_optional_text(&self.feedback, "feedback", MAX_NOTE_LEN)
    }
}

/// Outcome of a self-service check-in, reported with HTTP 200
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckinStatus {
    CheckedIn,
    AlreadyCheckedIn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckinReceipt {
    pub status: CheckinStatus,
    pub event_id: i64,
    pub member_id: String,
    pub checkin: Option<Checkin>,
}

/// Admin bulk import payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCheckinRequest {
    pub member_ids: Vec<String>,
}

/// REST bulk import payload; credentials travel in the body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestBulkCheckinRequest {
    pub username: String,
    pub password: String,
    pub event_id: i64,
    pub member_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkCheckinResult {
    /// Rows actually inserted
    pub count: u64,
    /// Distinct, non-empty ids received
    pub requested: usize,
    /// Ids skipped because no such member exists
    pub unknown_member_ids: Vec<String>,
}

/// Normalize, drop blanks and de-duplicate while keeping first-seen order.
pub fn normalize_member_ids<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::HashSet::new();
    raw.into_iter()
        .map(|id| normalize_member_id(id.as_ref()))
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
