//! Unified error system
//!
//! - [`ErrorCode`]: numeric codes for every failure the API can report
//! - [`ErrorCategory`]: classification of codes by domain
//! - [`AppError`]: error with code, message and structured details
//! - [`ErrorBody`]: JSON body of a failed request
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Store errors
//! - 4xxx: Employee errors
//! - 5xxx: Attendance errors
//! - 6xxx: Cash errors
//! - 7xxx: Report and target errors
//! - 8xxx: Shift note and checklist errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::validation("Invalid form")
//!     .with_field_error("nik", "NIK must be 16 digits");
//! assert_eq!(err.code, ErrorCode::ValidationFailed);
//!
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.code, ErrorCode::ValidationFailed.code());
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody, FIELDS_DETAIL_KEY};
