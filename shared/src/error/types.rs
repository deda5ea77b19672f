//! [`AppError`] and the JSON body every failed request returns

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Detail key under which per-field validation messages are collected
pub const FIELDS_DETAIL_KEY: &str = "fields";

/// Error raised anywhere between a repository and a handler
///
/// `details` carries structured context. Form failures put a `fields`
/// object in it mapping the field name to its message, which the web form
/// shows next to the input.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Error with the code's stock message
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Attach a message to a single form field
    pub fn with_field_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        let fields = self
            .details
            .get_or_insert_with(HashMap::new)
            .entry(FIELDS_DETAIL_KEY.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(map) = fields {
            map.insert(field.into(), Value::String(message.into()));
        }
        self
    }

    /// Message recorded for a form field, if any
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.details
            .as_ref()?
            .get(FIELDS_DETAIL_KEY)?
            .get(field)?
            .as_str()
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Validation failure on one field, e.g. `AppError::field("nik", "must be 16 digits")`
    pub fn field(field: impl Into<String>, msg: impl Into<String>) -> Self {
        let field = field.into();
        let msg = msg.into();
        Self::validation(format!("{field}: {msg}")).with_field_error(field, msg)
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    /// Same answer for unknown user and wrong password
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }
}

/// JSON body of a failed request
///
/// ```json
/// { "code": 5002, "message": "Attendance already recorded for this date",
///   "details": { "employee_id": 3 } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.http_status();
        let mut body = ErrorBody::from(&self);

        // System failures are logged here and answered with the stock message only
        if self.code.category() == ErrorCategory::System {
            tracing::error!(code = %self.code, message = %self.message, "System error occurred");
            body.message = self.code.message().to_string();
            body.details = None;
        }

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::AttendanceDuplicate);
        assert_eq!(err.code, ErrorCode::AttendanceDuplicate);
        assert_eq!(err.message, "Attendance already recorded for this date");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Missing required fields")
            .with_detail("store_id", 7)
            .with_detail("reason", "required");

        let details = err.details.unwrap();
        assert_eq!(details.get("store_id").unwrap(), 7);
        assert_eq!(details.get("reason").unwrap(), "required");
    }

    #[test]
    fn test_field_errors_accumulate() {
        let err = AppError::validation("Invalid form")
            .with_field_error("name", "must not be empty")
            .with_field_error("nik", "must be 16 digits");

        assert_eq!(err.field_error("name"), Some("must not be empty"));
        assert_eq!(err.field_error("nik"), Some("must be 16 digits"));
        assert_eq!(err.field_error("phone"), None);

        let fields = err.details.as_ref().unwrap().get(FIELDS_DETAIL_KEY).unwrap();
        assert_eq!(fields.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_single_field_constructor() {
        let err = AppError::field("amount", "must be greater than zero");
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "amount: must be greater than zero");
        assert_eq!(err.field_error("amount"), Some("must be greater than zero"));
    }

    #[test]
    fn test_constructor_statuses() {
        assert_eq!(AppError::unauthorized().code, ErrorCode::NotAuthenticated);
        assert_eq!(AppError::database("x").http_status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::conflict("x").http_status(), StatusCode::CONFLICT);
        assert_eq!(AppError::invalid_credentials().http_status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_error_body_keeps_field_details() {
        let err = AppError::field("date", "invalid date");
        let body = ErrorBody::from(&err);

        assert_eq!(body.code, ErrorCode::ValidationFailed.code());
        assert!(body.details.unwrap().contains_key(FIELDS_DETAIL_KEY));
    }

    #[test]
    fn test_error_body_omits_empty_details() {
        let body = ErrorBody::from(&AppError::new(ErrorCode::StoreNotFound));
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains(&format!("\"code\":{}", ErrorCode::StoreNotFound.code())));
        assert!(!json.contains("details"));
    }
}
