//! Input validation helpers
//!
//! Centralized text length constants and validation functions. Every payload
//! is checked here before the store is touched.

use crate::error::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Member and event names
pub const MAX_NAME_LEN: usize = 200;

/// Feedback, free-text identity, misc short notes
pub const MAX_NOTE_LEN: usize = 500;

/// Event descriptions (markdown)
pub const MAX_DESCRIPTION_LEN: usize = 10_000;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Postal addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Extended member data blob
pub const MAX_EXTENDED_DATA_LEN: usize = 20_000;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(
            AppError::validation(format!("{field} must not be empty")).with_detail("field", field)
        );
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Minimal email shape check: one `@` with a non-empty local part and a dotted domain.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::validation("Invalid email").with_detail("field", "email"));
    }
    Ok(())
}

/// Ensure `start <= end` for a pair of millisecond timestamps.
pub fn validate_window(start: i64, end: i64, what: &str) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::with_message(
            ErrorCode::InvalidEventWindow,
            format!("{what} ends before it starts"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_blank_and_long() {
        assert!(validate_required_text("ok", "name", 10).is_ok());
        assert!(validate_required_text("   ", "name", 10).is_err());
        let err = validate_required_text("abcdefghijk", "name", 10).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn optional_text_allows_none() {
        assert!(validate_optional_text(&None, "feedback", 3).is_ok());
        assert!(validate_optional_text(&Some("abcd".into()), "feedback", 3).is_err());
    }

    #[test]
    fn email_shapes() {
        assert!(validate_email("someone@example.edu").is_ok());
        assert!(validate_email("someone@localhost").is_err());
        assert!(validate_email("@example.edu").is_err());
        assert!(validate_email("a b@example.edu").is_err());
        assert!(validate_email("a@b@example.edu").is_err());
    }

    #[test]
    fn window_ordering() {
        assert!(validate_window(1, 1, "Event").is_ok());
        let err = validate_window(2, 1, "Event").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidEventWindow);
    }
}
