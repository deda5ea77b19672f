//! Shift Checklist Model

use serde::{Deserialize, Serialize};

use crate::metrics::completion_percent;

/// Checklist header
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ShiftChecklist {
    pub id: i64,
    pub store_id: i64,
    pub date: String,
    pub shift: i64,
    pub title: String,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One line of a checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ChecklistItem {
    pub id: i64,
    pub checklist_id: i64,
    pub label: String,
    pub position: i64,
    pub is_done: bool,
    pub done_at: Option<i64>,
    pub done_by: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftChecklistCreate {
    pub date: String,
    pub shift: i64,
    pub title: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// Update payload. `items`, when present, replaces every line (done flags reset).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftChecklistUpdate {
    pub title: Option<String>,
    pub items: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItemToggle {
    pub is_done: bool,
}

/// Checklist with its lines and completion
#[derive(Debug, Clone, Serialize)]
pub struct ShiftChecklistView {
    #[serde(flatten)]
    pub checklist: ShiftChecklist,
    pub items: Vec<ChecklistItem>,
    pub completion_percent: i64,
}

impl ShiftChecklistView {
    pub fn new(checklist: ShiftChecklist, mut items: Vec<ChecklistItem>) -> Self {
        items.sort_by_key(|i| i.position);
        let done = items.iter().filter(|i| i.is_done).count();
        Self {
            completion_percent: completion_percent(done, items.len()),
            checklist,
            items,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|i| i.is_done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, position: i64, is_done: bool) -> ChecklistItem {
        ChecklistItem {
            id,
            checklist_id: 1,
            label: format!("item {id}"),
            position,
            is_done,
            done_at: None,
            done_by: None,
        }
    }

    fn header() -> ShiftChecklist {
        ShiftChecklist {
            id: 1,
            store_id: 1,
            date: "2024-05-01".into(),
            shift: 2,
            title: "Closing".into(),
            created_by: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_completion() {
        let view = ShiftChecklistView::new(
            header(),
            vec![item(3, 2, false), item(1, 0, true), item(2, 1, true)],
        );
        assert_eq!(view.completion_percent, 67);
        assert_eq!(view.items[0].id, 1);
        assert!(!view.is_complete());
    }

    #[test]
    fn test_empty_checklist() {
        let view = ShiftChecklistView::new(header(), vec![]);
        assert_eq!(view.completion_percent, 0);
        assert!(!view.is_complete());
    }
}
