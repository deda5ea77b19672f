//! Report export handlers (PDF / XLSX)

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use http::header;

use crate::api::load_store;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::shift_report;
use crate::utils::{AppError, AppResult, ErrorCode};
use ops_report::{
    ExportResult, PDF_CONTENT_TYPE, ReportSheet, SheetRow, XLSX_CONTENT_TYPE, render_pdf,
    render_xlsx,
};
use shared::models::Store;

use super::handler::not_found;

#[derive(Debug, Clone, Copy)]
enum Format {
    Pdf,
    Xlsx,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Pdf => "pdf",
            Format::Xlsx => "xlsx",
        }
    }

    fn content_type(self) -> &'static str {
        match self {
            Format::Pdf => PDF_CONTENT_TYPE,
            Format::Xlsx => XLSX_CONTENT_TYPE,
        }
    }

    fn render(self, sheet: &ReportSheet) -> ExportResult<Vec<u8>> {
        match self {
            Format::Pdf => render_pdf(sheet),
            Format::Xlsx => render_xlsx(sheet),
        }
    }
}

fn file_name(store: &Store, month: &str, shift: i64, format: Format) -> String {
    format!(
        "laporan-{}-{}-shift{}.{}",
        store.code.to_lowercase(),
        month,
        shift,
        format.extension()
    )
}

async fn export(
    state: ServerState,
    current: CurrentUser,
    store_id: i64,
    id: i64,
    format: Format,
) -> AppResult<Response> {
    let store = load_store(&state, &current, store_id).await?;
    let report = shift_report::find_by_id(&state.pool, store_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let details = shift_report::find_details(&state.pool, id).await?;

    let rows = details
        .iter()
        .map(|d| SheetRow::new(d.date.clone(), d.figures()))
        .collect();
    let sheet = ReportSheet::new(store.display_name(), report.shift, report.month.clone())
        .with_rows(rows)
        .with_note(report.note.clone());

    // Rendering is CPU-bound
    let bytes = tokio::task::spawn_blocking(move || format.render(&sheet))
        .await
        .map_err(|e| AppError::internal(format!("Export task failed: {e}")))?
        .map_err(|e| {
            tracing::error!(report_id = id, format = format.extension(), error = %e, "Report export failed");
            AppError::with_message(ErrorCode::ExportFailed, e.to_string())
        })?;

    tracing::info!(store_id, report_id = id, format = format.extension(), bytes = bytes.len(), "Report exported");

    let disposition = format!(
        "attachment; filename=\"{}\"",
        file_name(&store, &report.month, report.shift, format)
    );
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// GET /api/stores/{id}/reports/{report_id}/export/pdf
pub async fn pdf(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
) -> AppResult<Response> {
    export(state, current, store_id, id, Format::Pdf).await
}

/// GET /api/stores/{id}/reports/{report_id}/export/xlsx
pub async fn xlsx(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
) -> AppResult<Response> {
    export(state, current, store_id, id, Format::Xlsx).await
}
