//! Member Model

use serde::{Deserialize, Serialize};

use super::member_data::{MemberDataInput, MemberProfile};
use super::checkin::Checkin;
use crate::error::{AppError, ErrorCode};
use crate::validation::{
    MAX_EXTENDED_DATA_LEN, MAX_NAME_LEN, validate_email, validate_optional_text,
    validate_required_text,
};

/// Member entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Member {
    /// Short id, always stored normalized (`abc123`)
    pub id: String,
    pub name: String,
    pub email: String,
    pub joined_at: i64,
    pub last_seen: Option<i64>,
    /// Free-form data carried over from registration forms
    pub extended_data: String,
}

/// Registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberCreate {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub extended_data: Option<String>,
    #[serde(default)]
    pub data: Option<MemberDataInput>,
}

impl MemberCreate {
    /// Validate and normalize in place (id and email lowercased, whitespace trimmed).
    pub fn normalize(&mut self) -> Result<(), AppError> {
        self.id = parse_member_id(&self.id)?;
        self.email = self.email.trim().to_lowercase();
        self.name = self.name.trim().to_string();
        validate_required_text(&self.name, "name", MAX_NAME_LEN)?;
        validate_email(&self.email)?;
        validate_optional_text(&self.extended_data, "extended_data", MAX_EXTENDED_DATA_LEN)?;
        if let Some(data) = &self.data {
            data.validate()?;
        }
        Ok(())
    }
}

/// Admin update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub extended_data: Option<String>,
    pub data: Option<MemberDataInput>,
}

impl MemberUpdate {
    pub fn normalize(&mut self) -> Result<(), AppError> {
        if let Some(name) = &mut self.name {
            *name = name.trim().to_string();
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        if let Some(email) = &mut self.email {
            *email = email.trim().to_lowercase();
            validate_email(email)?;
        }
        validate_optional_text(&self.extended_data, "extended_data", MAX_EXTENDED_DATA_LEN)?;
        if let Some(data) = &self.data {
            data.validate()?;
        }
        Ok(())
    }
}

/// Self-service profile update; `email` must match the stored record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub email: String,
    pub data: MemberDataInput,
}

/// Member with profile and check-in history (admin detail view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDetail {
    #[serde(flatten)]
    pub member: Member,
    pub profile: Option<MemberProfile>,
    pub checkins: Vec<Checkin>,
}

/// Points earned by a member, optionally restricted to one semester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsSummary {
    pub member_id: String,
    pub semester: Option<String>,
    pub points: i64,
    pub events_attended: i64,
}

/// Normalize (trim + lowercase) a raw member id without validating it.
pub fn normalize_member_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// `true` when `id` is exactly three ASCII lowercase letters followed by three digits.
pub fn is_valid_member_id(id: &str) -> bool {
    let bytes = id.as_bytes();
    bytes.len() == 6
        && bytes[..3].iter().all(u8::is_ascii_lowercase)
        && bytes[3..].iter().all(u8::is_ascii_digit)
}

/// Normalize and validate a member id supplied by a caller.
pub fn parse_member_id(raw: &str) -> Result<String, AppError> {
    let id = normalize_member_id(raw);
    if !is_valid_member_id(&id) {
        return Err(AppError::new(ErrorCode::InvalidMemberId).with_detail("member_id", raw));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_id_format() {
        assert!(is_valid_member_id("abc123"));
        assert!(!is_valid_member_id("ABC123"));
        assert!(!is_valid_member_id("ab1234"));
        assert!(!is_valid_member_id("abc12"));
        assert!(!is_valid_member_id("abc1234"));
        assert!(!is_valid_member_id("abcdef"));
    }

    #[test]
    fn member_id_is_case_insensitive() {
        assert_eq!(parse_member_id("  XyZ789 ").unwrap(), "xyz789");
        let err = parse_member_id("xy-789").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidMemberId);
    }

    #[test]
    fn create_normalizes_fields() {
        let mut create = MemberCreate {
            id: "QWE456".into(),
            name: "  Ada Lovelace ".into(),
            email: " Ada@Example.EDU ".into(),
            extended_data: None,
            data: None,
        };
        create.normalize().unwrap();
        assert_eq!(create.id, "qwe456");
        assert_eq!(create.name, "Ada Lovelace");
        assert_eq!(create.email, "ada@example.edu");
    }

    #[test]
    fn update_rejects_bad_email() {
        let mut update = MemberUpdate {
            email: Some("not-an-email".into()),
            ..Default::default()
        };
        assert!(update.normalize().is_err());
    }
}
