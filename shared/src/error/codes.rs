//! Unified error codes for the Roster service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 3xxx: Member errors
//! - 4xxx: Event errors
//! - 5xxx: Check-in errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 1xxx: Auth ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,

    // ==================== 3xxx: Member ====================
    /// Member not found
    MemberNotFound = 3001,
    /// Member id already registered
    MemberIdExists = 3002,
    /// Member email already registered
    MemberEmailExists = 3003,
    /// Member id does not match the `abc123` format
    InvalidMemberId = 3004,
    /// Supplied email does not match the member record
    MemberEmailMismatch = 3005,

    // ==================== 4xxx: Event ====================
    /// Event not found
    EventNotFound = 4001,
    /// Semester label is not `(Fall|Spring|Summer) YYYY`
    InvalidSemester = 4002,
    /// Event or form window ends before it starts
    InvalidEventWindow = 4003,
    /// Could not allocate a unique page id
    PageIdExhausted = 4004,

    // ==================== 5xxx: Check-in ====================
    /// Check-in form is not currently accepting submissions
    AdmissionWindowClosed = 5001,
    /// Member already checked in to this event
    AlreadyCheckedIn = 5002,
    /// Check-in not found
    CheckinNotFound = 5003,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::AlreadyExists => "Resource already exists",

            // Auth
            ErrorCode::NotAuthenticated => "Admin login required",
            ErrorCode::InvalidCredentials => "Invalid username or password",

            // Member
            ErrorCode::MemberNotFound => "Member not found",
            ErrorCode::MemberIdExists => "A member with this id is already registered",
            ErrorCode::MemberEmailExists => "A member with this email is already registered",
            ErrorCode::InvalidMemberId => "Member id must look like abc123",
            ErrorCode::MemberEmailMismatch => "Email does not match the member record",

            // Event
            ErrorCode::EventNotFound => "Event not found",
            ErrorCode::InvalidSemester => "Semester must look like \"Fall 2024\"",
            ErrorCode::InvalidEventWindow => "End time must not be before start time",
            ErrorCode::PageIdExhausted => "Could not allocate a unique event page id",

            // Check-in
            ErrorCode::AdmissionWindowClosed => "Check-in is not currently available",
            ErrorCode::AlreadyCheckedIn => "You're already checked in",
            ErrorCode::CheckinNotFound => "Check-in not found",

            // System
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            4 => Ok(ErrorCode::AlreadyExists),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),

            // Member
            3001 => Ok(ErrorCode::MemberNotFound),
            3002 => Ok(ErrorCode::MemberIdExists),
            3003 => Ok(ErrorCode::MemberEmailExists),
            3004 => Ok(ErrorCode::InvalidMemberId),
            3005 => Ok(ErrorCode::MemberEmailMismatch),

            // Event
            4001 => Ok(ErrorCode::EventNotFound),
            4002 => Ok(ErrorCode::InvalidSemester),
            4003 => Ok(ErrorCode::InvalidEventWindow),
            4004 => Ok(ErrorCode::PageIdExhausted),

            // Check-in
            5001 => Ok(ErrorCode::AdmissionWindowClosed),
            5002 => Ok(ErrorCode::AlreadyCheckedIn),
            5003 => Ok(ErrorCode::CheckinNotFound),

            // System
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
