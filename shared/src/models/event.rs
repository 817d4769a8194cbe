//! Event Model

use serde::{Deserialize, Serialize};

use super::member_data::Organization;
use super::semester::Semester;
use crate::error::AppError;
use crate::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_URL_LEN, validate_required_text, validate_window,
};

/// Event entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Event {
    pub id: i64,
    /// Public 7-char slug used in event page URLs
    pub page_id: String,
    pub name: String,
    /// Markdown
    pub description: String,
    pub header_image: String,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub organization: Organization,
    pub semester: String,
    pub location: String,
    pub event_start: i64,
    pub event_end: i64,
    pub form_open: i64,
    pub form_close: i64,
    /// Manual override: accept check-ins regardless of the time window
    pub forced_is_open: bool,
    pub points: i32,
}

/// Which time window gates check-in submissions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionWindow {
    /// `form_open < now < form_close`
    #[default]
    Form,
    /// `event_start < now < event_end`
    Event,
}

impl Event {
    /// Whether self-service check-in is accepted at `now`.
    ///
    /// Both window bounds are exclusive.
    pub fn is_admission_open(&self, now: i64, window: AdmissionWindow) -> bool {
        if self.forced_is_open {
            return true;
        }
        let (open, close) = match window {
            AdmissionWindow::Event => (self.event_start, self.event_end),
            AdmissionWindow::Form => (self.form_open, self.form_close),
        };
        open < now && now < close
    }
}

/// Create/replace payload. Omitted form times default to the event times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub header_image: String,
    pub organization: Organization,
    /// Inferred from `event_start` when omitted
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub location: String,
    pub event_start: i64,
    pub event_end: i64,
    #[serde(default)]
    pub form_open: Option<i64>,
    #[serde(default)]
    pub form_close: Option<i64>,
    #[serde(default)]
    pub forced_is_open: bool,
    #[serde(default = "default_points")]
    pub points: i32,
}

fn default_points() -> i32 {
    1
}

/// Validated event fields, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct EventFields {
    pub name: String,
    pub description: String,
    pub header_image: String,
    pub organization: Organization,
    pub semester: String,
    pub location: String,
    pub event_start: i64,
    pub event_end: i64,
    pub form_open: i64,
    pub form_close: i64,
    pub forced_is_open: bool,
    pub points: i32,
}

impl EventInput {
    /// Validate and fill defaults.
    ///
    /// `default_semester` is used when no semester label was supplied; callers
    /// derive it from `event_start` in the organization's time zone.
    pub fn resolve(self, default_semester: Semester) -> Result<EventFields, AppError> {
        let name = self.name.trim().to_string();
        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        if self.description.len() > MAX_DESCRIPTION_LEN {
            return Err(AppError::validation("description is too long"));
        }
        if self.header_image.len() > MAX_URL_LEN {
            return Err(AppError::validation("header_image is too long"));
        }
        if self.location.len() > MAX_NAME_LEN {
            return Err(AppError::validation("location is too long"));
        }
        if self.points < 0 {
            return Err(AppError::validation("points must not be negative"));
        }

        let semester = match self.semester.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.parse::<Semester>()?,
            _ => default_semester,
        };

        let form_open = self.form_open.unwrap_or(self.event_start);
        let form_close = self.form_close.unwrap_or(self.event_end);
        validate_window(self.event_start, self.event_end, "Event")?;
        validate_window(form_open, form_close, "Check-in form")?;

        Ok(EventFields {
            name,
            description: self.description,
            header_image: self.header_image.trim().to_string(),
            organization: self.organization,
            semester: semester.to_string(),
            location: self.location.trim().to_string(),
            event_start: self.event_start,
            event_end: self.event_end,
            form_open,
            form_close,
            forced_is_open: self.forced_is_open,
            points: self.points,
        })
    }
}

/// Event plus its number of check-ins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct EventListing {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub event: Event,
    pub checkin_count: i64,
}

/// Public event page payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventPage {
    #[serde(flatten)]
    pub event: Event,
    pub admission_open: bool,
    pub checkin_url: String,
}
