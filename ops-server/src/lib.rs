//! Store Ops Server - retail operations dashboard backend
//!
//! # Overview
//!
//! JSON API for convenience-store branches:
//!
//! - **Stores / employees** (`api::stores`, `api::employees`): master data and logins
//! - **Attendance** (`api::attendance`): one record per employee per day
//! - **Cash** (`api::cash`, `api::balances`): transactions, approvals, daily balance rollup
//! - **Sales** (`api::reports`, `api::targets`, `api::dashboard`): monthly shift reports,
//!   KPI targets and progress, PDF/XLSX export
//! - **Shift handover** (`api::notes`, `api::checklists`, `api::photo_grid`)
//!
//! # Layout
//!
//! ```text
//! ops-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT, argon2, middleware
//! ├── api/           # HTTP routers and handlers
//! ├── db/            # SQLite pool and repositories
//! └── utils/         # logger, time parsing, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ErrorBody, ErrorCategory, ErrorCode};

// Re-export logger setup
pub use utils::logger::{init_logger, init_logger_with_file};

/// Security event logging under the `security` target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
