//! Monthly store dashboard

use serde::{Deserialize, Serialize};

use super::{AttendanceCounts, CashMonthSummary, TargetProgress};

/// Summary cards for one store and month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDashboard {
    pub store_id: i64,
    pub store_code: String,
    pub store_name: String,
    pub month: String,
    /// All shifts combined
    pub sales: TargetProgress,
    /// One entry per shift 1..=3
    pub shifts: Vec<TargetProgress>,
    pub attendance: AttendanceCounts,
    pub cash: CashMonthSummary,
}
