//! Semester labels (`"Fall 2024"`) and ranges of them

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};

/// Academic term, ordered as it occurs within a calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Term {
    Spring = 1,
    Summer = 2,
    Fall = 3,
}

impl Term {
    pub fn name(self) -> &'static str {
        match self {
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Fall => "Fall",
        }
    }

    /// 1 = Spring, 2 = Summer, 3 = Fall
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Self::Spring),
            2 => Some(Self::Summer),
            3 => Some(Self::Fall),
            _ => None,
        }
    }

    /// Term a calendar month falls in: Jan–May Spring, Jun–Jul Summer, Aug–Dec Fall.
    pub fn for_month(month: u32) -> Self {
        match month {
            1..=5 => Self::Spring,
            6 | 7 => Self::Summer,
            _ => Self::Fall,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Semester {
    pub year: i32,
    pub term: Term,
}

impl Semester {
    pub fn new(term: Term, year: i32) -> Self {
        Self { year, term }
    }

    /// Semester containing a calendar date
    pub fn containing(date: NaiveDate) -> Self {
        Self::new(Term::for_month(date.month()), date.year())
    }

    /// Next semester, optionally skipping summer. `None` past the last representable year.
    pub fn next(self, include_summer: bool) -> Option<Self> {
        match self.term {
            Term::Spring if include_summer => Some(Self::new(Term::Summer, self.year)),
            Term::Spring | Term::Summer => Some(Self::new(Term::Fall, self.year)),
            Term::Fall => self.year.checked_add(1).map(|y| Self::new(Term::Spring, y)),
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.term.name(), self.year)
    }
}

impl FromStr for Semester {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::new(ErrorCode::InvalidSemester).with_detail("semester", s);
        let (term, year) = s.trim().split_once(' ').ok_or_else(invalid)?;
        let term = match term {
            "Spring" => Term::Spring,
            "Summer" => Term::Summer,
            "Fall" => Term::Fall,
            _ => return Err(invalid()),
        };
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year = year.parse().map_err(|_| invalid())?;
        Ok(Self::new(term, year))
    }
}

impl Serialize for Semester {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Semester {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Widest `from`..`to` span, in years, a caller may request
pub const MAX_SEMESTER_SPAN_YEARS: i32 = 50;

/// Every semester label from `start` through the last semester of `end_year`.
///
/// Returns an empty list when `start` is after `end_year`.
pub fn semester_range(start: Semester, end_year: i32, include_summer: bool) -> Vec<String> {
    let mut labels = Vec::new();
    let mut current = Some(start);
    if !include_summer && start.term == Term::Summer {
        current = start.next(false);
    }
    while let Some(semester) = current
        && semester.year <= end_year
    {
        labels.push(semester.to_string());
        current = semester.next(include_summer);
    }
    labels
}
