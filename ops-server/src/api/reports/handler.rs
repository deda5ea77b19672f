//! Shift Report API Handlers

use std::collections::HashSet;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::load_store;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, shift_report};
use crate::utils::time::{date_in_month, normalize_month, parse_date, parse_month};
use crate::utils::validation::{
    FieldErrors, MAX_NOTE_LEN, clean_optional, validate_non_negative, validate_optional_text,
    validate_shift,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    ShiftReportCreate, ShiftReportDetailInput, ShiftReportSummary, ShiftReportUpdate,
    ShiftReportView,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub month: Option<String>,
    pub shift: Option<i64>,
}

pub(super) fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::ReportNotFound).with_detail("report_id", id)
}

/// Normalize the daily rows of a report for `month` (`YYYY-MM`).
///
/// Every date must fall inside the month and appear once.
fn check_details(month: &str, details: &[ShiftReportDetailInput]) -> AppResult<Vec<ShiftReportDetailInput>> {
    let first = parse_month("month", month)?;

    let mut errors = FieldErrors::new();
    let mut parsed = Vec::with_capacity(details.len());
    for (i, detail) in details.iter().enumerate() {
        let date = errors.check(parse_date(&format!("details[{i}].date"), &detail.date));
        errors.check(validate_non_negative(&format!("details[{i}].spd"), detail.spd));
        errors.check(validate_non_negative(&format!("details[{i}].std"), detail.std));
        errors.check(validate_non_negative(&format!("details[{i}].pulsa"), detail.pulsa));
        if let Some(date) = date {
            parsed.push((i, date, detail));
        }
    }
    errors.into_result()?;

    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(parsed.len());
    for (i, date, detail) in parsed {
        let field = format!("details[{i}].date");
        if !date_in_month(date, first) {
            return Err(AppError::with_message(
                ErrorCode::ReportDateOutsideMonth,
                format!("{date} is outside {month}"),
            )
            .with_field_error(field, format!("must be within {month}")));
        }
        if !seen.insert(date) {
            return Err(AppError::with_message(
                ErrorCode::ReportDetailDuplicate,
                format!("Report already has a row for {date}"),
            )
            .with_field_error(field, "date appears more than once"));
        }
        rows.push(ShiftReportDetailInput {
            date: date.format("%Y-%m-%d").to_string(),
            spd: detail.spd,
            std: detail.std,
            pulsa: detail.pulsa,
        });
    }
    Ok(rows)
}

/// GET /api/stores/{id}/reports?month=&shift=
pub async fn list(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ShiftReportSummary>>> {
    load_store(&state, &current, store_id).await?;
    let month = query
        .month
        .as_deref()
        .map(|m| normalize_month("month", m))
        .transpose()?;
    if let Some(shift) = query.shift {
        validate_shift(shift)?;
    }
    let reports = shift_report::find_by_store(&state.pool, store_id, month.as_deref(), query.shift).await?;
    Ok(Json(reports))
}

/// GET /api/stores/{id}/reports/{report_id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<ShiftReportView>> {
    load_store(&state, &current, store_id).await?;
    let view = shift_report::find_view(&state.pool, store_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(view))
}

/// POST /api/stores/{id}/reports
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
    Json(mut payload): Json<ShiftReportCreate>,
) -> AppResult<Json<ShiftReportView>> {
    let mut errors = FieldErrors::new();
    errors.check(validate_shift(payload.shift));
    let month = errors.check(normalize_month("month", &payload.month));
    errors.check(validate_optional_text(&payload.note, "note", MAX_NOTE_LEN));
    errors.into_result()?;

    if let Some(month) = month {
        payload.month = month;
    }
    payload.details = check_details(&payload.month, &payload.details)?;
    payload.note = clean_optional(payload.note);

    load_store(&state, &current, store_id).await?;
    let view = shift_report::create(&state.pool, store_id, &payload, Some(current.id))
        .await
        .map_err(|e| e.conflict_as(ErrorCode::ReportDetailDuplicate))?;
    tracing::info!(
        store_id,
        report_id = view.report.id,
        month = %view.report.month,
        shift = view.report.shift,
        days = view.details.len(),
        "Shift report created"
    );
    Ok(Json(view))
}

/// PUT /api/stores/{id}/reports/{report_id}
///
/// `details`, when present, replaces every daily row.
pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
    Json(mut payload): Json<ShiftReportUpdate>,
) -> AppResult<Json<ShiftReportView>> {
    let mut errors = FieldErrors::new();
    if let Some(shift) = payload.shift {
        errors.check(validate_shift(shift));
    }
    errors.check(validate_optional_text(&payload.note, "note", MAX_NOTE_LEN));
    errors.into_result()?;

    load_store(&state, &current, store_id).await?;
    let existing = shift_report::find_by_id(&state.pool, store_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if let Some(details) = &payload.details {
        payload.details = Some(check_details(&existing.month, details)?);
    }

    let view = shift_report::update(&state.pool, store_id, id, &payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            other => other.conflict_as(ErrorCode::ReportDetailDuplicate),
        })?;
    tracing::info!(store_id, report_id = id, "Shift report updated");
    Ok(Json(view))
}

/// DELETE /api/stores/{id}/reports/{report_id}
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    load_store(&state, &current, store_id).await?;
    if !shift_report::delete(&state.pool, store_id, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(store_id, report_id = id, by = current.id, "Shift report deleted");
    Ok(Json(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str) -> ShiftReportDetailInput {
        ShiftReportDetailInput {
            date: date.into(),
            spd: 500_000,
            std: 20,
            pulsa: 0,
        }
    }

    #[test]
    fn test_rows_normalized() {
        let rows = check_details("2024-05", &[row(" 2024-05-02"), row("2024-05-01")]).unwrap();
        assert_eq!(rows[0].date, "2024-05-02");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_row_outside_month() {
        let err = check_details("2024-05", &[row("2024-06-01")]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ReportDateOutsideMonth);
        assert!(err.field_error("details[0].date").is_some());
    }

    #[test]
    fn test_repeated_date() {
        let err = check_details("2024-05", &[row("2024-05-01"), row("2024-05-01")]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ReportDetailDuplicate);
        assert!(err.field_error("details[1].date").is_some());
    }

    #[test]
    fn test_negative_figures() {
        let mut bad = row("2024-05-01");
        bad.std = -1;
        let err = check_details("2024-05", &[bad]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.field_error("details[0].std").is_some());
    }
}
