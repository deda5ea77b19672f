//! Unified error codes
//!
//! Error codes are organized by category:
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

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as its `u16` value so API clients can switch on numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,

    // ==================== 2xxx: Permission ====================
    /// Admin role required
    AdminRequired = 2002,
    /// Store user tried to reach another store
    StoreAccessDenied = 2003,

    // ==================== 3xxx: Store ====================
    /// Store not found
    StoreNotFound = 3001,
    /// Store code already in use
    StoreCodeExists = 3002,
    /// Store is inactive
    StoreInactive = 3003,

    // ==================== 4xxx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 4001,
    /// NIK already registered in this store
    EmployeeNikExists = 4002,
    /// Employee is inactive
    EmployeeInactive = 4003,
    /// Username already taken
    UsernameExists = 4004,
    /// User account not found
    UserNotFound = 4005,

    // ==================== 5xxx: Attendance ====================
    /// Attendance record not found
    AttendanceNotFound = 5001,
    /// Attendance already recorded for employee and date
    AttendanceDuplicate = 5002,
    /// Clock time is not HH:MM or clock-out precedes clock-in
    InvalidClockTime = 5004,

    // ==================== 6xxx: Cash ====================
    /// Cash transaction not found
    CashTransactionNotFound = 6001,
    /// Cash category not found
    CashCategoryNotFound = 6002,
    /// Cash category name already exists for this kind
    CashCategoryExists = 6003,
    /// Reference number collision
    ReferenceNoExists = 6004,
    /// Transaction already approved or rejected
    TransactionNotPending = 6005,
    /// Category kind differs from transaction kind
    CategoryKindMismatch = 6006,

    // ==================== 7xxx: Report / Target ====================
    /// Shift report not found
    ReportNotFound = 7001,
    /// Two detail rows share a date
    ReportDetailDuplicate = 7002,
    /// Detail date outside the report month
    ReportDateOutsideMonth = 7003,
    /// Target not found
    TargetNotFound = 7004,
    /// Target already set for store, month and shift
    TargetDuplicate = 7005,
    /// Month is not YYYY-MM
    InvalidMonth = 7006,
    /// PDF or spreadsheet rendering failed
    ExportFailed = 7007,

    // ==================== 8xxx: Notes / Checklists ====================
    /// Shift note not found
    NoteNotFound = 8001,
    /// Checklist not found
    ChecklistNotFound = 8002,
    /// Checklist item not found
    ChecklistItemNotFound = 8003,
    /// Photo grid dimensions or captions invalid
    PhotoGridInvalid = 8004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::AdminRequired => "Admin role required",
            ErrorCode::StoreAccessDenied => "No access to this store",

            // Store
            ErrorCode::StoreNotFound => "Store not found",
            ErrorCode::StoreCodeExists => "Store code already exists",
            ErrorCode::StoreInactive => "Store is inactive",

            // Employee
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::EmployeeNikExists => "NIK already registered in this store",
            ErrorCode::EmployeeInactive => "Employee is inactive",
            ErrorCode::UsernameExists => "Username already exists",
            ErrorCode::UserNotFound => "User not found",

            // Attendance
            ErrorCode::AttendanceNotFound => "Attendance record not found",
            ErrorCode::AttendanceDuplicate => "Attendance already recorded for this date",
            ErrorCode::InvalidClockTime => "Invalid clock time",

            // Cash
            ErrorCode::CashTransactionNotFound => "Cash transaction not found",
            ErrorCode::CashCategoryNotFound => "Cash category not found",
            ErrorCode::CashCategoryExists => "Cash category already exists",
            ErrorCode::ReferenceNoExists => "Reference number already exists",
            ErrorCode::TransactionNotPending => "Transaction is no longer pending",
            ErrorCode::CategoryKindMismatch => "Category does not match transaction kind",

            // Report / Target
            ErrorCode::ReportNotFound => "Shift report not found",
            ErrorCode::ReportDetailDuplicate => "Report already has a row for this date",
            ErrorCode::ReportDateOutsideMonth => "Date is outside the report month",
            ErrorCode::TargetNotFound => "Target not found",
            ErrorCode::TargetDuplicate => "Target already set for this month and shift",
            ErrorCode::InvalidMonth => "Month must be formatted as YYYY-MM",
            ErrorCode::ExportFailed => "Export failed",

            // Notes / Checklists
            ErrorCode::NoteNotFound => "Shift note not found",
            ErrorCode::ChecklistNotFound => "Checklist not found",
            ErrorCode::ChecklistItemNotFound => "Checklist item not found",
            ErrorCode::PhotoGridInvalid => "Invalid photo grid configuration",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2002 => Ok(ErrorCode::AdminRequired),
            2003 => Ok(ErrorCode::StoreAccessDenied),

            // Store
            3001 => Ok(ErrorCode::StoreNotFound),
            3002 => Ok(ErrorCode::StoreCodeExists),
            3003 => Ok(ErrorCode::StoreInactive),

            // Employee
            4001 => Ok(ErrorCode::EmployeeNotFound),
            4002 => Ok(ErrorCode::EmployeeNikExists),
            4003 => Ok(ErrorCode::EmployeeInactive),
            4004 => Ok(ErrorCode::UsernameExists),
            4005 => Ok(ErrorCode::UserNotFound),

            // Attendance
            5001 => Ok(ErrorCode::AttendanceNotFound),
            5002 => Ok(ErrorCode::AttendanceDuplicate),
            5004 => Ok(ErrorCode::InvalidClockTime),

            // Cash
            6001 => Ok(ErrorCode::CashTransactionNotFound),
            6002 => Ok(ErrorCode::CashCategoryNotFound),
            6003 => Ok(ErrorCode::CashCategoryExists),
            6004 => Ok(ErrorCode::ReferenceNoExists),
            6005 => Ok(ErrorCode::TransactionNotPending),
            6006 => Ok(ErrorCode::CategoryKindMismatch),

            // Report / Target
            7001 => Ok(ErrorCode::ReportNotFound),
            7002 => Ok(ErrorCode::ReportDetailDuplicate),
            7003 => Ok(ErrorCode::ReportDateOutsideMonth),
            7004 => Ok(ErrorCode::TargetNotFound),
            7005 => Ok(ErrorCode::TargetDuplicate),
            7006 => Ok(ErrorCode::InvalidMonth),
            7007 => Ok(ErrorCode::ExportFailed),

            // Notes / Checklists
            8001 => Ok(ErrorCode::NoteNotFound),
            8002 => Ok(ErrorCode::ChecklistNotFound),
            8003 => Ok(ErrorCode::ChecklistItemNotFound),
            8004 => Ok(ErrorCode::PhotoGridInvalid),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
