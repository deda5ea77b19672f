//! Attendance Model

use serde::{Deserialize, Serialize};

/// Daily attendance status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Sick,
    Leave,
    Off,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 6] = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Late,
        AttendanceStatus::Sick,
        AttendanceStatus::Leave,
        AttendanceStatus::Off,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Sick => "sick",
            AttendanceStatus::Leave => "leave",
            AttendanceStatus::Off => "off",
        }
    }

    /// Label shown on store screens
    pub fn label(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Hadir",
            AttendanceStatus::Absent => "Alpa",
            AttendanceStatus::Late => "Terlambat",
            AttendanceStatus::Sick => "Sakit",
            AttendanceStatus::Leave => "Izin",
            AttendanceStatus::Off => "Libur",
        }
    }

    /// Statuses for which the employee was physically on shift
    pub fn is_on_duty(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

/// One employee, one calendar date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Attendance {
    pub id: i64,
    pub store_id: i64,
    pub employee_id: i64,
    /// Joined from employees
    pub employee_name: String,
    pub date: String,
    pub shift: i64,
    /// `HH:MM`
    pub clock_in: Option<String>,
    /// `HH:MM`
    pub clock_out: Option<String>,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Attendance {
    pub fn status_label(&self) -> &'static str {
        self.status.label()
    }
}

/// Create attendance payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceCreate {
    pub employee_id: i64,
    pub date: String,
    pub shift: i64,
    pub clock_in: Option<String>,
    pub clock_out: Option<String>,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

/// Update attendance payload (employee and date are fixed once recorded)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceUpdate {
    pub shift: Option<i64>,
    pub clock_in: Option<String>,
    pub clock_out: Option<String>,
    pub status: Option<AttendanceStatus>,
    pub note: Option<String>,
}

/// Per-employee status counts for a month
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AttendanceSummary {
    pub employee_id: i64,
    pub employee_name: String,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub sick: i64,
    pub leave: i64,
    pub off: i64,
}

impl AttendanceSummary {
    pub fn total(&self) -> i64 {
        self.present + self.absent + self.late + self.sick + self.leave + self.off
    }

    pub fn days_on_duty(&self) -> i64 {
        self.present + self.late
    }
}

/// Store-wide status counts for a month
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceCounts {
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub sick: i64,
    pub leave: i64,
    pub off: i64,
}

impl AttendanceCounts {
    pub fn from_summaries(rows: &[AttendanceSummary]) -> Self {
        rows.iter().fold(Self::default(), |acc, r| Self {
            present: acc.present + r.present,
            absent: acc.absent + r.absent,
            late: acc.late + r.late,
            sick: acc.sick + r.sick,
            leave: acc.leave + r.leave,
            off: acc.off + r.off,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&AttendanceStatus::Sick).unwrap();
        assert_eq!(json, "\"sick\"");
        let parsed: AttendanceStatus = serde_json::from_str("\"leave\"").unwrap();
        assert_eq!(parsed, AttendanceStatus::Leave);
        assert!(serde_json::from_str::<AttendanceStatus>("\"holiday\"").is_err());
    }

    #[test]
    fn test_on_duty() {
        assert!(AttendanceStatus::Late.is_on_duty());
        assert!(!AttendanceStatus::Off.is_on_duty());
    }

    #[test]
    fn test_counts_fold() {
        let rows = vec![
            AttendanceSummary {
                employee_id: 1,
                employee_name: "Sari".into(),
                present: 20,
                late: 2,
                off: 4,
                ..Default::default()
            },
            AttendanceSummary {
                employee_id: 2,
                employee_name: "Budi".into(),
                present: 18,
                sick: 3,
                off: 4,
                ..Default::default()
            },
        ];
        let counts = AttendanceCounts::from_summaries(&rows);
        assert_eq!(counts.present, 38);
        assert_eq!(counts.off, 8);
        assert_eq!(rows[0].total(), 26);
        assert_eq!(rows[1].days_on_duty(), 18);
    }
}
