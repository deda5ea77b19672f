//! # ops-report
//!
//! Shift report export library - rendering only.
//!
//! ## Scope
//!
//! This crate handles HOW a report is rendered:
//! - Fixed-column table model ([`ReportSheet`]) with a computed totals row
//! - PDF document (header, summary boxes, table body, totals footer)
//! - XLSX workbook (title rows, bold header row, one row per day, totals row)
//!
//! Loading reports and deciding who may export them stays in ops-server.
//!
//! ## Example
//!
//! ```ignore
//! use ops_report::{ReportSheet, SheetRow, render_pdf, render_xlsx};
//! use shared::metrics::DailyFigures;
//!
//! let sheet = ReportSheet::new("TK01 - Sudirman", 1, "2024-05")
//!     .with_rows(vec![
//!         SheetRow::new("2024-05-01", DailyFigures::new(500_000, 20, 0)),
//!         SheetRow::new("2024-05-02", DailyFigures::new(700_000, 25, 0)),
//!     ]);
//!
//! let pdf: Vec<u8> = render_pdf(&sheet)?;
//! let xlsx: Vec<u8> = render_xlsx(&sheet)?;
//! ```

mod error;
mod pdf;
mod sheet;
mod xlsx;

// Re-exports
pub use error::{ExportError, ExportResult};
pub use pdf::render_pdf;
pub use sheet::{COLUMNS, ReportSheet, SheetRow};
pub use xlsx::render_xlsx;

/// MIME type of [`render_pdf`] output
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// MIME type of [`render_xlsx`] output
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
