//! Repository Module
//!
//! Free async functions over `&SqlitePool`, one module per table family.
//! Store-scoped records always take `store_id` so a lookup can never cross stores.

// People
pub mod employee;
pub mod store;
pub mod user;

// Daily operations
pub mod attendance;
pub mod balance;
pub mod cash;
pub mod cash_category;

// Sales
pub mod shift_report;
pub mod target;

// Shift handover
pub mod checklist;
pub mod photo_grid;
pub mod shift_note;

use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violated
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Row is not in a state that allows the operation
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("record".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                RepoError::Validation("referenced record does not exist or is still in use".into())
            }
            sqlx::Error::Database(db) if db.is_check_violation() => {
                RepoError::Validation(db.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl RepoError {
    /// Replace the raw constraint text of a unique violation with a user-facing message
    pub fn on_duplicate(self, message: impl Into<String>) -> Self {
        match self {
            RepoError::Duplicate(_) => RepoError::Duplicate(message.into()),
            other => other,
        }
    }

    /// Map duplicates and state conflicts to a domain error code
    pub fn conflict_as(self, code: ErrorCode) -> AppError {
        match self {
            RepoError::Duplicate(msg) | RepoError::Conflict(msg) => AppError::with_message(code, msg),
            other => other.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) | RepoError::Conflict(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

#[cfg(test)]
pub(crate) mod test_support {
    use shared::models::{Store, StoreCreate};
    use sqlx::SqlitePool;

    use crate::db::DbService;

    pub async fn pool() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }

    pub async fn store(pool: &SqlitePool, code: &str) -> Store {
        super::store::create(
            pool,
            &StoreCreate {
                code: code.into(),
                name: format!("Toko {code}"),
                area: Some("Jakarta".into()),
                address: None,
                phone: None,
                photo: None,
            },
        )
        .await
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_mapping() {
        let err = RepoError::Duplicate("UNIQUE constraint failed".into())
            .on_duplicate("Target for 2024-05 shift 1 already exists")
            .conflict_as(ErrorCode::TargetDuplicate);
        assert_eq!(err.code, ErrorCode::TargetDuplicate);
        assert_eq!(err.message, "Target for 2024-05 shift 1 already exists");
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
    }

    #[test]
    fn test_default_mapping() {
        let err: AppError = RepoError::Validation("bad".into()).into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let err = RepoError::NotFound("x".into()).conflict_as(ErrorCode::TargetDuplicate);
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
