//! Table model shared by both renderers

use serde::Serialize;
use shared::metrics::{DailyFigures, SalesTotals};

use crate::error::{ExportError, ExportResult};

/// Column headers, in order
pub const COLUMNS: [&str; 6] = ["No", "Tanggal", "SPD", "STD", "APC", "Pulsa"];

/// Longest month
const MAX_ROWS: usize = 31;

const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// One day of the table body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetRow {
    pub date: String,
    pub figures: DailyFigures,
}

impl SheetRow {
    pub fn new(date: impl Into<String>, figures: DailyFigures) -> Self {
        Self {
            date: date.into(),
            figures,
        }
    }

    pub fn apc(&self) -> i64 {
        self.figures.apc()
    }
}

/// A monthly shift report laid out as a fixed-column table
#[derive(Debug, Clone, Serialize)]
pub struct ReportSheet {
    pub title: String,
    pub store_label: String,
    pub shift: i64,
    /// `YYYY-MM`
    pub month: String,
    pub note: Option<String>,
    rows: Vec<SheetRow>,
}

impl ReportSheet {
    pub fn new(store_label: impl Into<String>, shift: i64, month: impl Into<String>) -> Self {
        Self {
            title: "Laporan Penjualan Shift".to_string(),
            store_label: store_label.into(),
            shift,
            month: month.into(),
            note: None,
            rows: Vec::new(),
        }
    }

    /// Replace the body; rows are kept in date order
    pub fn with_rows(mut self, mut rows: Vec<SheetRow>) -> Self {
        rows.sort_by(|a, b| a.date.cmp(&b.date));
        self.rows = rows;
        self
    }

    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note.filter(|n| !n.trim().is_empty());
        self
    }

    pub fn rows(&self) -> &[SheetRow] {
        &self.rows
    }

    pub fn totals(&self) -> SalesTotals {
        SalesTotals::from_days(self.rows.iter().map(|r| r.figures))
    }

    /// `Mei 2024` for `2024-05`; the raw value when it does not parse
    pub fn month_label(&self) -> String {
        let parsed = self.month.split_once('-').and_then(|(y, m)| {
            let idx = m.parse::<usize>().ok()?.checked_sub(1)?;
            MONTH_NAMES.get(idx).map(|name| format!("{name} {y}"))
        });
        parsed.unwrap_or_else(|| self.month.clone())
    }

    pub fn subtitle(&self) -> String {
        format!("{} | Shift {} | {}", self.store_label, self.shift, self.month_label())
    }

    pub(crate) fn validate(&self) -> ExportResult<()> {
        if self.rows.len() > MAX_ROWS {
            return Err(ExportError::InvalidSheet(format!(
                "{} rows exceed the {MAX_ROWS} days of a month",
                self.rows.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> ReportSheet {
        ReportSheet::new("TK01 - Sudirman", 1, "2024-05").with_rows(vec![
            SheetRow::new("2024-05-02", DailyFigures::new(700_000, 25, 30_000)),
            SheetRow::new("2024-05-01", DailyFigures::new(500_000, 20, 50_000)),
        ])
    }

    #[test]
    fn test_rows_sorted_by_date() {
        let s = sheet();
        assert_eq!(s.rows()[0].date, "2024-05-01");
        assert_eq!(s.rows()[1].date, "2024-05-02");
    }

    #[test]
    fn test_totals_row() {
        let totals = sheet().totals();
        assert_eq!(totals.spd, 1_200_000);
        assert_eq!(totals.std, 45);
        assert_eq!(totals.pulsa, 80_000);
        assert_eq!(totals.apc, 26_500);
    }

    #[test]
    fn test_month_label() {
        assert_eq!(sheet().month_label(), "Mei 2024");
        assert_eq!(ReportSheet::new("x", 1, "2024-13").month_label(), "2024-13");
        assert_eq!(ReportSheet::new("x", 1, "bad").month_label(), "bad");
    }

    #[test]
    fn test_subtitle() {
        assert_eq!(sheet().subtitle(), "TK01 - Sudirman | Shift 1 | Mei 2024");
    }

    #[test]
    fn test_blank_note_dropped() {
        assert!(sheet().with_note(Some("  ".into())).note.is_none());
        assert_eq!(
            sheet().with_note(Some("Stock opname".into())).note.as_deref(),
            Some("Stock opname")
        );
    }

    #[test]
    fn test_too_many_rows() {
        let rows = (1..=32)
            .map(|d| SheetRow::new(format!("2024-05-{d:02}"), DailyFigures::default()))
            .collect();
        let s = ReportSheet::new("x", 1, "2024-05").with_rows(rows);
        assert!(matches!(s.validate(), Err(ExportError::InvalidSheet(_))));
    }
}
