//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::StoreNotFound
            | Self::EmployeeNotFound
            | Self::UserNotFound
            | Self::AttendanceNotFound
            | Self::CashTransactionNotFound
            | Self::CashCategoryNotFound
            | Self::ReportNotFound
            | Self::TargetNotFound
            | Self::NoteNotFound
            | Self::ChecklistNotFound
            | Self::ChecklistItemNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::StoreCodeExists
            | Self::EmployeeNikExists
            | Self::UsernameExists
            | Self::AttendanceDuplicate
            | Self::CashCategoryExists
            | Self::ReferenceNoExists
            | Self::TransactionNotPending
            | Self::ReportDetailDuplicate
            | Self::TargetDuplicate => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::AdminRequired | Self::StoreAccessDenied => StatusCode::FORBIDDEN,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError | Self::ExportFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_statuses() {
        assert_eq!(ErrorCode::AttendanceDuplicate.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::TargetDuplicate.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::ReferenceNoExists.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_other_statuses() {
        assert_eq!(ErrorCode::ReportNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::TokenExpired.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::StoreAccessDenied.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::ValidationFailed.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidMonth.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
