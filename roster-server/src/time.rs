//! Organization time zone helpers
//!
//! Date → timestamp conversions happen here; the store only sees `i64` Unix millis.

use chrono::{DateTime, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use shared::AppError;
use shared::models::Semester;

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(date: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {date}")))
}

/// Local midnight of `date` as Unix millis.
///
/// DST gap fallback: when local midnight does not exist, use UTC midnight.
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Calendar date of a timestamp in the organization's time zone
pub fn local_date(millis: i64, tz: Tz) -> NaiveDate {
    DateTime::from_timestamp_millis(millis)
        .unwrap_or_default()
        .with_timezone(&tz)
        .date_naive()
}

/// Semester a timestamp falls in
pub fn semester_at(millis: i64, tz: Tz) -> Semester {
    Semester::containing(local_date(millis, tz))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midnight_respects_zone() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let utc = day_start_millis(date, Tz::UTC);
        let chicago = day_start_millis(date, chrono_tz::America::Chicago);
        assert_eq!(chicago - utc, 6 * 3_600_000);
    }

    #[test]
    fn local_date_crosses_midnight() {
        // 2024-09-02T03:00:00Z is still Sep 1 in Chicago
        let millis = 1_725_246_000_000;
        assert_eq!(local_date(millis, Tz::UTC).to_string(), "2024-09-02");
        assert_eq!(
            local_date(millis, chrono_tz::America::Chicago).to_string(),
            "2024-09-01"
        );
    }

    #[test]
    fn semester_follows_local_month() {
        // 2024-08-01T03:00:00Z is July 31 in Chicago
        let millis = 1_722_481_200_000;
        assert_eq!(semester_at(millis, Tz::UTC).to_string(), "Fall 2024");
        assert_eq!(
            semester_at(millis, chrono_tz::America::Chicago).to_string(),
            "Summer 2024"
        );
    }

    #[test]
    fn bad_dates_are_rejected() {
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("03/04/2024").is_err());
        assert!(parse_date(" 2024-03-04 ").is_ok());
    }
}
