//! Cash Models (categories, transactions, daily balances)

use serde::{Deserialize, Serialize};

use crate::util::format_rupiah;

/// Direction of a cash movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum CashKind {
    Income,
    Expense,
}

impl CashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CashKind::Income => "income",
            CashKind::Expense => "expense",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CashKind::Income => "Pemasukan",
            CashKind::Expense => "Pengeluaran",
        }
    }
}

/// Approval state of a cash transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "Menunggu",
            ApprovalStatus::Approved => "Disetujui",
            ApprovalStatus::Rejected => "Ditolak",
        }
    }
}

/// Cash category master data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CashCategory {
    pub id: i64,
    pub name: String,
    pub kind: CashKind,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashCategoryCreate {
    pub name: String,
    pub kind: CashKind,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CashCategoryUpdate {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

/// Store cash movement awaiting or past approval
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CashTransaction {
    pub id: i64,
    pub store_id: i64,
    pub category_id: i64,
    /// Joined from cash_categories
    pub category_name: String,
    pub kind: CashKind,
    /// Rupiah, always positive; `kind` gives the sign
    pub amount: i64,
    pub transaction_date: String,
    pub description: Option<String>,
    /// `CT-YYYYMMDD-XXXXXXXX`, unique across all stores
    pub reference_no: String,
    pub status: ApprovalStatus,
    pub created_by: Option<i64>,
    pub approved_by: Option<i64>,
    pub approved_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CashTransaction {
    pub fn formatted_amount(&self) -> String {
        format_rupiah(self.amount)
    }

    /// Amount with its effect on the balance: positive for income
    pub fn signed_amount(&self) -> i64 {
        match self.kind {
            CashKind::Income => self.amount,
            CashKind::Expense => -self.amount,
        }
    }

    pub fn status_label(&self) -> &'static str {
        self.status.label()
    }

    pub fn counts_toward_balance(&self) -> bool {
        self.status == ApprovalStatus::Approved
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashTransactionCreate {
    pub category_id: i64,
    pub kind: CashKind,
    pub amount: i64,
    pub transaction_date: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CashTransactionUpdate {
    pub category_id: Option<i64>,
    pub amount: Option<i64>,
    pub transaction_date: Option<String>,
    pub description: Option<String>,
}

/// Daily cash rollup for one store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CashBalance {
    pub id: i64,
    pub store_id: i64,
    pub date: String,
    pub opening_balance: i64,
    pub total_income: i64,
    pub total_expense: i64,
    pub closing_balance: i64,
    pub updated_at: i64,
}

impl CashBalance {
    /// Closing balance implied by the other three figures
    pub fn expected_closing(opening: i64, income: i64, expense: i64) -> i64 {
        opening.saturating_add(income).saturating_sub(expense)
    }

    pub fn is_consistent(&self) -> bool {
        self.closing_balance
            == Self::expected_closing(self.opening_balance, self.total_income, self.total_expense)
    }

    pub fn formatted_closing(&self) -> String {
        format_rupiah(self.closing_balance)
    }
}

/// Approved cash movement totals for a month
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashMonthSummary {
    pub total_income: i64,
    pub total_expense: i64,
    pub net: i64,
    pub pending_count: i64,
    /// Closing balance of the latest balance row in the month
    pub closing_balance: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(kind: CashKind, amount: i64, status: ApprovalStatus) -> CashTransaction {
        CashTransaction {
            id: 1,
            store_id: 1,
            category_id: 1,
            category_name: "Setoran".into(),
            kind,
            amount,
            transaction_date: "2024-05-01".into(),
            description: None,
            reference_no: "CT-20240501-0A1B2C3D".into(),
            status,
            created_by: None,
            approved_by: None,
            approved_at: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(tx(CashKind::Income, 50_000, ApprovalStatus::Approved).signed_amount(), 50_000);
        assert_eq!(tx(CashKind::Expense, 20_000, ApprovalStatus::Pending).signed_amount(), -20_000);
    }

    #[test]
    fn test_only_approved_counts() {
        assert!(tx(CashKind::Income, 1, ApprovalStatus::Approved).counts_toward_balance());
        assert!(!tx(CashKind::Income, 1, ApprovalStatus::Pending).counts_toward_balance());
        assert!(!tx(CashKind::Income, 1, ApprovalStatus::Rejected).counts_toward_balance());
    }

    #[test]
    fn test_formatted_amount() {
        assert_eq!(
            tx(CashKind::Expense, 1_250_000, ApprovalStatus::Pending).formatted_amount(),
            "Rp 1.250.000"
        );
    }

    #[test]
    fn test_balance_consistency() {
        let balance = CashBalance {
            id: 1,
            store_id: 1,
            date: "2024-05-02".into(),
            opening_balance: 100_000,
            total_income: 50_000,
            total_expense: 30_000,
            closing_balance: 120_000,
            updated_at: 0,
        };
        assert!(balance.is_consistent());
        assert_eq!(balance.formatted_closing(), "Rp 120.000");
    }

    #[test]
    fn test_expected_closing_saturates() {
        assert_eq!(CashBalance::expected_closing(i64::MAX, 1, 0), i64::MAX);
        assert_eq!(CashBalance::expected_closing(0, 0, i64::MAX), -i64::MAX);
        assert_eq!(CashBalance::expected_closing(i64::MIN, 0, 1), i64::MIN);
    }
}
