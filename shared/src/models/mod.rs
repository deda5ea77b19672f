//! Data models
//!
//! Shared between ops-server, ops-report and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), money is integer rupiah,
//! dates are `YYYY-MM-DD` and months `YYYY-MM`.

pub mod attendance;
pub mod cash;
pub mod checklist;
pub mod dashboard;
pub mod employee;
pub mod photo_grid;
pub mod shift_note;
pub mod shift_report;
pub mod store;
pub mod target;
pub mod user;

// Re-exports
pub use attendance::*;
pub use cash::*;
pub use checklist::*;
pub use dashboard::*;
pub use employee::*;
pub use photo_grid::*;
pub use shift_note::*;
pub use shift_report::*;
pub use store::*;
pub use target::*;
pub use user::*;

/// Shift numbers a store runs
pub const SHIFTS: [i64; 3] = [1, 2, 3];

/// Whether `shift` is one of the store's three shifts
pub fn is_valid_shift(shift: i64) -> bool {
    SHIFTS.contains(&shift)
}
