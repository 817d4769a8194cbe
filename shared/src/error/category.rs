//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 3xxx: Member errors
/// - 4xxx: Event errors
/// - 5xxx: Check-in errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Member errors (3xxx)
    Member,
    /// Event errors (4xxx)
    Event,
    /// Check-in errors (5xxx)
    Checkin,
    /// System errors (9xxx and unassigned ranges)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            3000..4000 => Self::Member,
            4000..5000 => Self::Event,
            5000..6000 => Self::Checkin,
            _ => Self::System,
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Member);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Event);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Checkin);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::NotAuthenticated.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::MemberNotFound.category(), ErrorCategory::Member);
        assert_eq!(ErrorCode::EventNotFound.category(), ErrorCategory::Event);
        assert_eq!(
            ErrorCode::AlreadyCheckedIn.category(),
            ErrorCategory::Checkin
        );
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Checkin).unwrap();
        assert_eq!(json, "\"checkin\"");
        let category: ErrorCategory = serde_json::from_str("\"member\"").unwrap();
        assert_eq!(category, ErrorCategory::Member);
    }
}
