//! Shift Note Model (handover notes)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ShiftNote {
    pub id: i64,
    pub store_id: i64,
    pub date: String,
    pub shift: i64,
    pub author_id: Option<i64>,
    pub author_name: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftNoteCreate {
    pub date: String,
    pub shift: i64,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftNoteUpdate {
    pub shift: Option<i64>,
    pub content: Option<String>,
}
