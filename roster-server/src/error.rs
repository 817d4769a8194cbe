//! Unified service-layer error type
//!
//! `ServiceError` bridges DB-layer errors (`sqlx::Error`, `BoxError`) and the
//! API-layer error (`AppError`), so handlers can use `?` without mapping and
//! logging every storage failure by hand.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::services::checkin::CheckinError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error
///
/// - `Db`: storage/infrastructure errors (logged, mapped to DatabaseError)
/// - `App`: business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<CheckinError> for ServiceError {
    fn from(e: CheckinError) -> Self {
        match e {
            CheckinError::Store(db_err) => ServiceError::Db(db_err),
            CheckinError::InvalidMemberId(raw) => ServiceError::App(
                AppError::new(ErrorCode::InvalidMemberId).with_detail("member_id", raw),
            ),
            CheckinError::MemberNotFound(id) => ServiceError::App(AppError::member_not_found(&id)),
            CheckinError::EventNotFound(id) => ServiceError::App(AppError::event_not_found(id)),
            CheckinError::AdmissionWindowClosed => {
                ServiceError::App(AppError::new(ErrorCode::AdmissionWindowClosed))
            }
            CheckinError::AlreadyCheckedIn => {
                ServiceError::App(AppError::new(ErrorCode::AlreadyCheckedIn))
            }
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::database("Storage operation failed")
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    fn status(e: CheckinError) -> StatusCode {
        AppError::from(ServiceError::from(e)).http_status()
    }

    #[test]
    fn checkin_errors_map_to_statuses() {
        assert_eq!(status(CheckinError::MemberNotFound("abc123".into())), StatusCode::NOT_FOUND);
        assert_eq!(status(CheckinError::EventNotFound(7)), StatusCode::NOT_FOUND);
        assert_eq!(status(CheckinError::AdmissionWindowClosed), StatusCode::FORBIDDEN);
        assert_eq!(status(CheckinError::AlreadyCheckedIn), StatusCode::CONFLICT);
        assert_eq!(status(CheckinError::InvalidMemberId("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(CheckinError::Store("connection reset".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_errors_hide_driver_text() {
        let err = AppError::from(ServiceError::Db("password authentication failed".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Storage operation failed");
        assert!(err.details.is_none());
    }
}
