//! Store Model

use serde::{Deserialize, Serialize};

/// Store branch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Store {
    pub id: i64,
    /// Branch code, unique across the chain (e.g. `TK01`)
    pub code: String,
    pub name: String,
    pub area: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Storefront photo path or URL
    pub photo: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Store {
    pub fn status_label(&self) -> &'static str {
        if self.is_active { "Aktif" } else { "Nonaktif" }
    }

    /// `TK01 - Sudirman` style label used in report headers
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}

/// Create store payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCreate {
    pub code: String,
    pub name: String,
    pub area: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub photo: Option<String>,
}

/// Update store payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreUpdate {
    pub code: Option<String>,
    pub name: Option<String>,
    pub area: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub photo: Option<String>,
    pub is_active: Option<bool>,
}
