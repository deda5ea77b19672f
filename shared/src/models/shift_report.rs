//! Shift Report Model (monthly header + one row per day)

use serde::{Deserialize, Serialize};

use crate::metrics::{DailyFigures, SalesTotals, apc};

/// Monthly report header for one store shift
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ShiftReport {
    pub id: i64,
    pub store_id: i64,
    pub shift: i64,
    /// `YYYY-MM`
    pub month: String,
    pub note: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Sales figures for one day of a report. APC is derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ShiftReportDetail {
    pub id: i64,
    pub report_id: i64,
    pub date: String,
    /// Sales per day (rupiah)
    pub spd: i64,
    /// Transaction count
    pub std: i64,
    /// Airtime sales (rupiah)
    pub pulsa: i64,
}

impl ShiftReportDetail {
    pub fn apc(&self) -> i64 {
        apc(self.spd, self.std)
    }

    pub fn figures(&self) -> DailyFigures {
        DailyFigures::new(self.spd, self.std, self.pulsa)
    }
}

/// Detail row as submitted from the form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftReportDetailInput {
    pub date: String,
    pub spd: i64,
    pub std: i64,
    #[serde(default)]
    pub pulsa: i64,
}

/// Create report payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftReportCreate {
    pub shift: i64,
    pub month: String,
    pub note: Option<String>,
    #[serde(default)]
    pub details: Vec<ShiftReportDetailInput>,
}

/// Update report payload. `details`, when present, replaces every row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftReportUpdate {
    pub shift: Option<i64>,
    pub note: Option<String>,
    pub details: Option<Vec<ShiftReportDetailInput>>,
}

/// Detail row with its derived APC
#[derive(Debug, Clone, Serialize)]
pub struct ShiftReportDetailView {
    #[serde(flatten)]
    pub detail: ShiftReportDetail,
    pub apc: i64,
}

/// Report as returned by the API: header, ordered rows, totals row
#[derive(Debug, Clone, Serialize)]
pub struct ShiftReportView {
    #[serde(flatten)]
    pub report: ShiftReport,
    pub details: Vec<ShiftReportDetailView>,
    pub totals: SalesTotals,
}

impl ShiftReportView {
    /// Build the view; rows are sorted by date.
    pub fn new(report: ShiftReport, mut details: Vec<ShiftReportDetail>) -> Self {
        details.sort_by(|a, b| a.date.cmp(&b.date));
        let totals = SalesTotals::from_days(details.iter().map(ShiftReportDetail::figures));
        let details = details
            .into_iter()
            .map(|detail| ShiftReportDetailView {
                apc: detail.apc(),
                detail,
            })
            .collect();
        Self {
            report,
            details,
            totals,
        }
    }
}

/// Report list entry with its totals
#[derive(Debug, Clone, Serialize)]
pub struct ShiftReportSummary {
    #[serde(flatten)]
    pub report: ShiftReport,
    pub totals: SalesTotals,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> ShiftReport {
        ShiftReport {
            id: 1,
            store_id: 1,
            shift: 1,
            month: "2024-05".into(),
            note: None,
            created_by: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn detail(id: i64, date: &str, spd: i64, std: i64) -> ShiftReportDetail {
        ShiftReportDetail {
            id,
            report_id: 1,
            date: date.into(),
            spd,
            std,
            pulsa: 0,
        }
    }

    #[test]
    fn test_detail_apc() {
        assert_eq!(detail(1, "2024-05-01", 1_000_000, 40).apc(), 25_000);
    }

    #[test]
    fn test_view_orders_rows_and_totals() {
        let view = ShiftReportView::new(
            header(),
            vec![
                detail(2, "2024-05-02", 700_000, 25),
                detail(1, "2024-05-01", 500_000, 20),
            ],
        );
        assert_eq!(view.details[0].detail.date, "2024-05-01");
        assert_eq!(view.details[0].apc, 25_000);
        assert_eq!(view.details[1].apc, 28_000);
        assert_eq!(view.totals.spd, 1_200_000);
        assert_eq!(view.totals.std, 45);
    }

    #[test]
    fn test_view_serializes_flat() {
        let view = ShiftReportView::new(header(), vec![detail(1, "2024-05-01", 1_000_000, 40)]);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["month"], "2024-05");
        assert_eq!(json["details"][0]["apc"], 25_000);
        assert_eq!(json["details"][0]["spd"], 1_000_000);
        assert_eq!(json["totals"]["apc"], 25_000);
    }
}
