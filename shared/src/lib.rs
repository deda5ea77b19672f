//! Shared types for the store ops dashboard
//!
//! Domain records, the unified error system, and small utilities used by
//! both the HTTP server and the export renderers.

pub mod error;
pub mod metrics;
pub mod models;
pub mod util;

pub use error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};
