//! Employee Model

use serde::{Deserialize, Serialize};

/// Number of trailing NIK digits appended to the store code in a generated password
pub const PASSWORD_NIK_SUFFIX_LEN: usize = 3;

/// Store employee, identified by NIK within its store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,
    pub store_id: i64,
    /// National identity number (16 digits)
    pub nik: String,
    pub name: String,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Employee {
    pub fn status_label(&self) -> &'static str {
        if self.is_active { "Aktif" } else { "Nonaktif" }
    }
}

/// Initial password for an employee login: store code followed by the last
/// three digits of the NIK.
///
/// ```
/// use shared::models::generated_password;
/// assert_eq!(generated_password("TK01", "3201010101900123"), "TK01123");
/// ```
pub fn generated_password(store_code: &str, nik: &str) -> String {
    let digits: Vec<char> = nik.chars().filter(|c| c.is_ascii_digit()).collect();
    let start = digits.len().saturating_sub(PASSWORD_NIK_SUFFIX_LEN);
    let suffix: String = digits[start..].iter().collect();
    format!("{}{}", store_code.trim(), suffix)
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub nik: String,
    pub name: String,
    pub position: Option<String>,
    pub phone: Option<String>,
}

/// Update employee payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub nik: Option<String>,
    pub name: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

/// Login credentials handed out when an employee account is provisioned or reset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCredentials {
    pub user_id: i64,
    pub username: String,
    pub initial_password: String,
}

/// Employee together with its freshly provisioned login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeAccount {
    pub employee: Employee,
    pub credentials: EmployeeCredentials,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_password_rule() {
        assert_eq!(generated_password("TK01", "3201010101900123"), "TK01123");
        assert_eq!(generated_password("JKT-07", "3174055512880009"), "JKT-07009");
    }

    #[test]
    fn test_generated_password_short_nik() {
        assert_eq!(generated_password("TK01", "42"), "TK0142");
        assert_eq!(generated_password(" TK01 ", ""), "TK01");
    }

    #[test]
    fn test_generated_password_ignores_separators() {
        assert_eq!(generated_password("TK01", "3201-0101-0190-0123"), "TK01123");
    }
}
