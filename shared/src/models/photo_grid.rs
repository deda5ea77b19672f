//! Photo Grid Configuration (store display photo layout)

use serde::{Deserialize, Serialize};

pub const MIN_GRID_SIZE: i64 = 1;
pub const MAX_GRID_SIZE: i64 = 6;
pub const DEFAULT_GRID_SIZE: i64 = 2;

/// Per-store grid layout for the photo report page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PhotoGridConfig {
    pub store_id: i64,
    pub columns: i64,
    pub rows: i64,
    /// Slot captions in row-major order, at most `columns * rows`
    #[cfg_attr(feature = "db", sqlx(json))]
    pub captions: Vec<String>,
    pub updated_at: i64,
}

impl PhotoGridConfig {
    /// Layout used until a store saves its own
    pub fn default_for(store_id: i64) -> Self {
        Self {
            store_id,
            columns: DEFAULT_GRID_SIZE,
            rows: DEFAULT_GRID_SIZE,
            captions: Vec::new(),
            updated_at: 0,
        }
    }

    pub fn slot_count(&self) -> i64 {
        self.columns * self.rows
    }

    /// Caption for a slot, empty when none was set
    pub fn caption(&self, slot: usize) -> &str {
        self.captions.get(slot).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoGridUpdate {
    pub columns: i64,
    pub rows: i64,
    #[serde(default)]
    pub captions: Vec<String>,
}
