//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category derived from the thousands digit of the code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Store errors (3xxx)
    Store,
    /// Employee errors (4xxx)
    Employee,
    /// Attendance errors (5xxx)
    Attendance,
    /// Cash errors (6xxx)
    Cash,
    /// Report and target errors (7xxx)
    Report,
    /// Shift note and checklist errors (8xxx)
    Shift,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Store,
            4000..5000 => Self::Employee,
            5000..6000 => Self::Attendance,
            6000..7000 => Self::Cash,
            7000..8000 => Self::Report,
            8000..9000 => Self::Shift,
            _ => Self::System,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Store => "store",
            Self::Employee => "employee",
            Self::Attendance => "attendance",
            Self::Cash => "cash",
            Self::Report => "report",
            Self::Shift => "shift",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(2), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1002), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(5002), ErrorCategory::Attendance);
        assert_eq!(ErrorCategory::from_code(6004), ErrorCategory::Cash);
        assert_eq!(ErrorCategory::from_code(9002), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::TargetDuplicate.category(), ErrorCategory::Report);
        assert_eq!(ErrorCode::ChecklistNotFound.category(), ErrorCategory::Shift);
        assert_eq!(ErrorCode::StoreAccessDenied.category(), ErrorCategory::Permission);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Attendance).unwrap();
        assert_eq!(json, "\"attendance\"");
        assert_eq!(ErrorCategory::Cash.name(), "cash");
    }
}
