//! KPI Target API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::{MonthQuery, load_store};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, shift_report, target};
use crate::utils::time::normalize_month;
use crate::utils::validation::{FieldErrors, validate_non_negative, validate_shift};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Target, TargetCreate, TargetProgress, TargetUpdate};

#[derive(Debug, Default, Deserialize)]
pub struct ProgressQuery {
    pub month: Option<String>,
    pub shift: Option<i64>,
}

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::TargetNotFound).with_detail("target_id", id)
}

fn check_values(errors: &mut FieldErrors, values: [(&str, Option<i64>); 4]) {
    for (field, value) in values {
        if let Some(value) = value {
            errors.check(validate_non_negative(field, value));
        }
    }
}

/// Progress of one shift, or the whole store when `shift` is `None`
pub(crate) async fn compute_progress(
    state: &ServerState,
    store_id: i64,
    month: &str,
    shift: Option<i64>,
) -> AppResult<TargetProgress> {
    let targets = target::find_for_month(&state.pool, store_id, month, shift).await?;
    let actual = shift_report::actual_totals(&state.pool, store_id, month, shift).await?;
    Ok(TargetProgress::compute(store_id, month, shift, &targets, actual))
}

/// GET /api/stores/{id}/targets?month=
pub async fn list(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<Vec<Target>>> {
    load_store(&state, &current, store_id).await?;
    let month = query
        .month
        .as_deref()
        .map(|m| normalize_month("month", m))
        .transpose()?;
    Ok(Json(target::find_by_store(&state.pool, store_id, month.as_deref()).await?))
}

/// GET /api/stores/{id}/targets/{target_id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<Target>> {
    load_store(&state, &current, store_id).await?;
    let row = target::find_by_id(&state.pool, store_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(row))
}

/// POST /api/stores/{id}/targets - one target per month and shift
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
    Json(mut payload): Json<TargetCreate>,
) -> AppResult<Json<Target>> {
    let mut errors = FieldErrors::new();
    let month = errors.check(normalize_month("month", &payload.month));
    errors.check(validate_shift(payload.shift));
    check_values(
        &mut errors,
        [
            ("target_spd", Some(payload.target_spd)),
            ("target_std", Some(payload.target_std)),
            ("target_apc", Some(payload.target_apc)),
            ("target_pulsa", Some(payload.target_pulsa)),
        ],
    );
    errors.into_result()?;
    if let Some(month) = month {
        payload.month = month;
    }

    load_store(&state, &current, store_id).await?;
    let created = target::create(&state.pool, store_id, &payload)
        .await
        .map_err(|e| e.conflict_as(ErrorCode::TargetDuplicate))?;
    tracing::info!(store_id, target_id = created.id, month = %created.month, shift = created.shift, "Target created");
    Ok(Json(created))
}

/// PUT /api/stores/{id}/targets/{target_id}
pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
    Json(payload): Json<TargetUpdate>,
) -> AppResult<Json<Target>> {
    let mut errors = FieldErrors::new();
    check_values(
        &mut errors,
        [
            ("target_spd", payload.target_spd),
            ("target_std", payload.target_std),
            ("target_apc", payload.target_apc),
            ("target_pulsa", payload.target_pulsa),
        ],
    );
    errors.into_result()?;

    load_store(&state, &current, store_id).await?;
    let updated = target::update(&state.pool, store_id, id, &payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            other => other.into(),
        })?;
    Ok(Json(updated))
}

/// DELETE /api/stores/{id}/targets/{target_id}
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    load_store(&state, &current, store_id).await?;
    if !target::delete(&state.pool, store_id, id).await? {
        return Err(not_found(id));
    }
    Ok(Json(true))
}

/// GET /api/stores/{id}/targets/progress?month=&shift=
pub async fn progress(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
    Query(query): Query<ProgressQuery>,
) -> AppResult<Json<TargetProgress>> {
    load_store(&state, &current, store_id).await?;
    let month = MonthQuery { month: query.month }.resolve()?;
    if let Some(shift) = query.shift {
        validate_shift(shift)?;
    }
    Ok(Json(compute_progress(&state, store_id, &month, query.shift).await?))
}
