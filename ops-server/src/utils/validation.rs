//! Input validation helpers
//!
//! Centralized text length limits and field checks. Handlers gather every
//! failing field into a [`FieldErrors`] so the form can show them all at once.

use serde_json::Value;
use shared::error::FIELDS_DETAIL_KEY;
use shared::models::is_valid_shift;

use crate::utils::{AppError, AppResult};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: store, employee, category, checklist title
pub const MAX_NAME_LEN: usize = 200;

/// Store codes (`TK01`, `JKT-07`)
pub const MAX_CODE_LEN: usize = 20;

/// Notes, descriptions, checklist item labels
pub const MAX_NOTE_LEN: usize = 500;

/// Shift handover note body
pub const MAX_CONTENT_LEN: usize = 5000;

/// Short identifiers: phone, position, area
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Indonesian national identity number length
pub const NIK_LEN: usize = 16;

/// Largest rupiah figure accepted from a form (one trillion)
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

// ── Field checks ────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::field(field, "must not be empty"));
    }
    if value.chars().count() > max_len {
        return Err(AppError::field(
            field,
            format!("is too long ({} chars, max {max_len})", value.chars().count()),
        ));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: &Option<String>, field: &str, max_len: usize) -> AppResult<()> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::field(
            field,
            format!("is too long ({} chars, max {max_len})", v.chars().count()),
        ));
    }
    Ok(())
}

/// NIK must be exactly 16 digits
pub fn validate_nik(nik: &str) -> AppResult<()> {
    if nik.len() != NIK_LEN || !nik.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::field("nik", format!("must be {NIK_LEN} digits")));
    }
    Ok(())
}

pub fn validate_shift(shift: i64) -> AppResult<()> {
    if !is_valid_shift(shift) {
        return Err(AppError::field("shift", "must be 1, 2 or 3"));
    }
    Ok(())
}

/// Strictly positive rupiah amount
pub fn validate_amount(field: &str, amount: i64) -> AppResult<()> {
    if amount <= 0 {
        return Err(AppError::field(field, "must be greater than zero"));
    }
    check_max_amount(field, amount)
}

pub fn validate_non_negative(field: &str, value: i64) -> AppResult<()> {
    if value < 0 {
        return Err(AppError::field(field, "must not be negative"));
    }
    check_max_amount(field, value)
}

fn check_max_amount(field: &str, value: i64) -> AppResult<()> {
    if value > MAX_AMOUNT {
        return Err(AppError::field(field, format!("must not exceed {MAX_AMOUNT}")));
    }
    Ok(())
}

/// Store code: letters, digits and dashes
pub fn validate_store_code(code: &str) -> AppResult<()> {
    validate_required_text(code, "code", MAX_CODE_LEN)?;
    if !code
        .trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(AppError::field("code", "may only contain letters, digits and '-'"));
    }
    Ok(())
}

/// Trim an optional text field, mapping blank input to `None`
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ── Collector ───────────────────────────────────────────────────────

/// Accumulates per-field validation failures
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<(String, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push((field.into(), message.into()));
    }

    /// Record the outcome of a field check, returning the parsed value on success
    pub fn check<T>(&mut self, result: AppResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.absorb(err);
                None
            }
        }
    }

    fn absorb(&mut self, err: AppError) {
        let fields = err
            .details
            .as_ref()
            .and_then(|d| d.get(FIELDS_DETAIL_KEY))
            .and_then(Value::as_object);
        match fields {
            Some(map) if !map.is_empty() => {
                for (field, message) in map {
                    self.add(field.clone(), message.as_str().unwrap_or_default());
                }
            }
            _ => self.add("_", err.message),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` when nothing failed, otherwise one `ValidationFailed` error
    /// listing every field
    pub fn into_result(self) -> AppResult<()> {
        let Some((first_field, first_message)) = self.errors.first() else {
            return Ok(());
        };
        let mut err = AppError::validation(format!("{first_field}: {first_message}"));
        for (field, message) in self.errors {
            err = err.with_field_error(field, message);
        }
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Sudirman", "name", MAX_NAME_LEN).is_ok());
        let err = validate_required_text("   ", "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.field_error("name"), Some("must not be empty"));
        assert!(validate_required_text(&"x".repeat(21), "code", MAX_CODE_LEN).is_err());
    }

    #[test]
    fn test_nik() {
        assert!(validate_nik("3201010101900123").is_ok());
        assert!(validate_nik("320101010190012").is_err());
        assert!(validate_nik("32010101019001A3").is_err());
    }

    #[test]
    fn test_shift_and_amount() {
        assert!(validate_shift(3).is_ok());
        assert!(validate_shift(0).is_err());
        assert!(validate_amount("amount", 1).is_ok());
        assert!(validate_amount("amount", 0).is_err());
    }

    #[test]
    fn test_amount_upper_bound() {
        assert!(validate_amount("amount", MAX_AMOUNT).is_ok());
        let err = validate_amount("amount", MAX_AMOUNT + 1).unwrap_err();
        assert_eq!(err.field_error("amount"), Some("must not exceed 1000000000000"));

        assert!(validate_non_negative("spd", 0).is_ok());
        assert!(validate_non_negative("spd", MAX_AMOUNT).is_ok());
        assert!(validate_non_negative("spd", i64::MAX).is_err());
        assert!(validate_non_negative("spd", -1).is_err());
    }

    #[test]
    fn test_store_code() {
        assert!(validate_store_code("TK-01").is_ok());
        assert!(validate_store_code("TK 01").is_err());
    }

    #[test]
    fn test_collector_reports_every_field() {
        let mut errors = FieldErrors::new();
        errors.check(validate_nik("123"));
        errors.check(validate_shift(4));
        let parsed = errors.check(Ok::<_, AppError>(7));
        assert_eq!(parsed, Some(7));

        let err = errors.into_result().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.field_error("nik").is_some());
        assert!(err.field_error("shift").is_some());
    }

    #[test]
    fn test_collector_empty_is_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_clean_optional() {
        assert_eq!(clean_optional(Some("  ".into())), None);
        assert_eq!(clean_optional(Some(" Jl. Sudirman ".into())), Some("Jl. Sudirman".into()));
    }
}
