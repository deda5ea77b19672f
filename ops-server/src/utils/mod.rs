//! Utilities: logging, time parsing, input validation
//!
//! Error and response types come from `shared::error` and are re-exported here.

pub mod logger;
pub mod time;
pub mod validation;

pub use shared::error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};
