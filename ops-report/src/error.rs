//! Error types for the export library

use thiserror::Error;

/// Export error types
#[derive(Debug, Error)]
pub enum ExportError {
    /// PDF document could not be built or serialized
    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    /// Workbook could not be built or serialized
    #[error("Spreadsheet rendering failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// Sheet content outside what the template can hold
    #[error("Invalid sheet: {0}")]
    InvalidSheet(String),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;
