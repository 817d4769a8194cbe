//! Event listing filters and derived statistics

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::event::{Event, EventListing};
use super::member_data::{FlagTag, Organization};
use super::semester::Semester;
use crate::error::AppError;

/// Lower bound on `event_end`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PastFilter {
    /// Only events that have not ended yet
    #[default]
    Upcoming,
    /// No bound
    All,
    /// Events ending on/after the start of this date
    Since(NaiveDate),
}

impl FromStr for PastFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("false") {
            return Ok(Self::Upcoming);
        }
        if s.eq_ignore_ascii_case("true") {
            return Ok(Self::All);
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self::Since)
            .map_err(|_| {
                AppError::validation("past must be true, false or a YYYY-MM-DD date")
                    .with_detail("past", s)
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSort {
    /// `event_end` ascending
    #[default]
    Recent,
    /// Check-in count descending, ties by `event_end` ascending
    Attendance,
}

impl FromStr for EventSort {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recent" => Ok(Self::Recent),
            "attendance" => Ok(Self::Attendance),
            _ => Err(AppError::validation("sort must be recent or attendance").with_detail("sort", s)),
        }
    }
}

impl EventSort {
    pub fn apply(self, listings: &mut [EventListing]) {
        match self {
            Self::Recent => listings.sort_by_key(|l| (l.event.event_end, l.event.id)),
            Self::Attendance => listings.sort_by(|a, b| {
                b.checkin_count
                    .cmp(&a.checkin_count)
                    .then(a.event.event_end.cmp(&b.event.event_end))
                    .then(a.event.id.cmp(&b.event.id))
            }),
        }
    }
}

/// Parsed event filter. Clauses are ANDed; each set matches any of its values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub past: PastFilter,
    pub sort: EventSort,
    pub organizations: BTreeSet<Organization>,
    /// Canonical semester labels
    pub semesters: BTreeSet<String>,
}

impl EventFilter {
    /// Resolve the `event_end` lower bound.
    ///
    /// `day_start` maps a calendar date to the millisecond timestamp of its
    /// midnight in the organization's time zone.
    pub fn end_bound(&self, now: i64, day_start: impl Fn(NaiveDate) -> i64) -> Option<i64> {
        match self.past {
            PastFilter::Upcoming => Some(now),
            PastFilter::All => None,
            PastFilter::Since(date) => Some(day_start(date)),
        }
    }

    pub fn matches(&self, event: &Event, end_bound: Option<i64>) -> bool {
        end_bound.is_none_or(|bound| event.event_end >= bound)
            && (self.organizations.is_empty() || self.organizations.contains(&event.organization))
            && (self.semesters.is_empty() || self.semesters.contains(&event.semester))
    }
}

/// Raw `?past=&sort=&organizations=&semesters=` query; lists are comma-separated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventQuery {
    pub past: Option<String>,
    pub sort: Option<String>,
    pub organizations: Option<String>,
    pub semesters: Option<String>,
}

fn split_list(raw: &Option<String>) -> impl Iterator<Item = &str> {
    raw.as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

impl TryFrom<EventQuery> for EventFilter {
    type Error = AppError;

    fn try_from(query: EventQuery) -> Result<Self, Self::Error> {
        let past = match query.past.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse()?,
            _ => PastFilter::default(),
        };
        let sort = match query.sort.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse()?,
            _ => EventSort::default(),
        };
        let organizations = split_list(&query.organizations)
            .map(|tag| {
                Organization::from_tag(tag).ok_or_else(|| {
                    AppError::validation("Unknown organization").with_detail("organization", tag)
                })
            })
            .collect::<Result<_, _>>()?;
        let semesters = split_list(&query.semesters)
            .map(|label| label.parse::<Semester>().map(|s| s.to_string()))
            .collect::<Result<_, _>>()?;

        Ok(Self {
            past,
            sort,
            organizations,
            semesters,
        })
    }
}

/// One calendar week of check-in totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyCheckins {
    /// `"{month}/{day}"` of the week's Monday, unpadded
    pub week: String,
    pub week_start: NaiveDate,
    pub count: i64,
}
