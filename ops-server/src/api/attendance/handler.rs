//! Attendance API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::api::{MonthQuery, load_store};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::attendance::{self, AttendanceFilter};
use crate::db::repository::{RepoError, employee};
use crate::utils::time::{month_date_range, normalize_date, parse_clock};
use crate::utils::validation::{FieldErrors, MAX_NOTE_LEN, clean_optional, validate_optional_text, validate_shift};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Attendance, AttendanceCounts, AttendanceCreate, AttendanceSummary, AttendanceUpdate};

/// `date` wins over `month` when both are given
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub date: Option<String>,
    pub month: Option<String>,
    pub employee_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub month: String,
    pub employees: Vec<AttendanceSummary>,
    pub totals: AttendanceCounts,
}

fn check_clocks(errors: &mut FieldErrors, clock_in: &Option<String>, clock_out: &Option<String>) {
    if let Some(clock) = clock_in {
        errors.check(parse_clock("clock_in", clock));
    }
    if let Some(clock) = clock_out {
        errors.check(parse_clock("clock_out", clock));
    }
}

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::AttendanceNotFound).with_detail("attendance_id", id)
}

/// GET /api/stores/{id}/attendance
pub async fn list(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Attendance>>> {
    load_store(&state, &current, store_id).await?;

    let filter = match (&query.date, &query.month) {
        (Some(date), _) => {
            let date = normalize_date("date", date)?;
            AttendanceFilter {
                date_from: Some(date.clone()),
                date_to: Some(date),
                employee_id: query.employee_id,
            }
        }
        (None, Some(month)) => {
            let (from, to) = month_date_range(month)?;
            AttendanceFilter {
                date_from: Some(from),
                date_to: Some(to),
                employee_id: query.employee_id,
            }
        }
        (None, None) => AttendanceFilter {
            employee_id: query.employee_id,
            ..Default::default()
        },
    };

    let rows = attendance::find_by_store(&state.pool, store_id, &filter).await?;
    Ok(Json(rows))
}

/// GET /api/stores/{id}/attendance/summary?month=YYYY-MM
pub async fn summary(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<SummaryResponse>> {
    load_store(&state, &current, store_id).await?;
    let month = query.resolve()?;
    let (from, to) = month_date_range(&month)?;
    let employees = attendance::summary(&state.pool, store_id, &from, &to).await?;
    Ok(Json(SummaryResponse {
        totals: AttendanceCounts::from_summaries(&employees),
        month,
        employees,
    }))
}

/// GET /api/stores/{id}/attendance/{attendance_id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<Attendance>> {
    load_store(&state, &current, store_id).await?;
    let row = attendance::find_by_id(&state.pool, store_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(row))
}

/// POST /api/stores/{id}/attendance
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
    Json(mut payload): Json<AttendanceCreate>,
) -> AppResult<Json<Attendance>> {
    let mut errors = FieldErrors::new();
    let date = errors.check(normalize_date("date", &payload.date));
    errors.check(validate_shift(payload.shift));
    check_clocks(&mut errors, &payload.clock_in, &payload.clock_out);
    errors.check(validate_optional_text(&payload.note, "note", MAX_NOTE_LEN));
    errors.into_result()?;

    load_store(&state, &current, store_id).await?;
    let worker = employee::find_by_id(&state.pool, store_id, payload.employee_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::EmployeeNotFound).with_field_error("employee_id", "unknown employee")
        })?;
    if !worker.is_active {
        return Err(AppError::new(ErrorCode::EmployeeInactive).with_field_error("employee_id", "employee is inactive"));
    }

    if let Some(date) = date {
        payload.date = date;
    }
    payload.clock_in = clean_optional(payload.clock_in);
    payload.clock_out = clean_optional(payload.clock_out);
    payload.note = clean_optional(payload.note);

    let created = attendance::create(&state.pool, store_id, &payload)
        .await
        .map_err(|e| e.conflict_as(ErrorCode::AttendanceDuplicate))?;
    tracing::info!(store_id, attendance_id = created.id, employee_id = created.employee_id, date = %created.date, "Attendance recorded");
    Ok(Json(created))
}

/// PUT /api/stores/{id}/attendance/{attendance_id}
pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
    Json(payload): Json<AttendanceUpdate>,
) -> AppResult<Json<Attendance>> {
    let mut errors = FieldErrors::new();
    if let Some(shift) = payload.shift {
        errors.check(validate_shift(shift));
    }
    check_clocks(&mut errors, &payload.clock_in, &payload.clock_out);
    errors.check(validate_optional_text(&payload.note, "note", MAX_NOTE_LEN));
    errors.into_result()?;

    load_store(&state, &current, store_id).await?;
    let updated = attendance::update(&state.pool, store_id, id, &payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            other => other.into(),
        })?;
    Ok(Json(updated))
}

/// DELETE /api/stores/{id}/attendance/{attendance_id}
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    load_store(&state, &current, store_id).await?;
    if !attendance::delete(&state.pool, store_id, id).await? {
        return Err(not_found(id));
    }
    Ok(Json(true))
}
