//! Shift Checklist API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::load_store;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, checklist};
use crate::utils::time::normalize_date;
use crate::utils::validation::{
    FieldErrors, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text, validate_shift,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    ChecklistItemToggle, ShiftChecklistCreate, ShiftChecklistUpdate, ShiftChecklistView,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub date: Option<String>,
    pub shift: Option<i64>,
}

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::ChecklistNotFound).with_detail("checklist_id", id)
}

fn check_items(errors: &mut FieldErrors, items: &[String]) {
    for (i, label) in items.iter().enumerate() {
        errors.check(validate_required_text(label, &format!("items[{i}]"), MAX_SHORT_TEXT_LEN));
    }
}

/// GET /api/stores/{id}/checklists?date=&shift=
pub async fn list(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ShiftChecklistView>>> {
    load_store(&state, &current, store_id).await?;
    let date = query
        .date
        .as_deref()
        .map(|d| normalize_date("date", d))
        .transpose()?;
    Ok(Json(
        checklist::find_by_store(&state.pool, store_id, date.as_deref(), query.shift).await?,
    ))
}

/// GET /api/stores/{id}/checklists/{checklist_id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<ShiftChecklistView>> {
    load_store(&state, &current, store_id).await?;
    let view = checklist::find_by_id(&state.pool, store_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(view))
}

/// POST /api/stores/{id}/checklists
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
    Json(mut payload): Json<ShiftChecklistCreate>,
) -> AppResult<Json<ShiftChecklistView>> {
    let mut errors = FieldErrors::new();
    let date = errors.check(normalize_date("date", &payload.date));
    errors.check(validate_shift(payload.shift));
    errors.check(validate_required_text(&payload.title, "title", MAX_NAME_LEN));
    check_items(&mut errors, &payload.items);
    errors.into_result()?;
    if let Some(date) = date {
        payload.date = date;
    }

    load_store(&state, &current, store_id).await?;
    let view = checklist::create(&state.pool, store_id, &payload, Some(current.id)).await?;
    Ok(Json(view))
}

/// PUT /api/stores/{id}/checklists/{checklist_id}
///
/// A new `items` list replaces the old one and clears all progress.
pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
    Json(payload): Json<ShiftChecklistUpdate>,
) -> AppResult<Json<ShiftChecklistView>> {
    let mut errors = FieldErrors::new();
    if let Some(title) = &payload.title {
        errors.check(validate_required_text(title, "title", MAX_NAME_LEN));
    }
    if let Some(items) = &payload.items {
        check_items(&mut errors, items);
    }
    errors.into_result()?;

    load_store(&state, &current, store_id).await?;
    let view = checklist::update(&state.pool, store_id, id, &payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            other => other.into(),
        })?;
    Ok(Json(view))
}

/// DELETE /api/stores/{id}/checklists/{checklist_id}
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    load_store(&state, &current, store_id).await?;
    if !checklist::delete(&state.pool, store_id, id).await? {
        return Err(not_found(id));
    }
    Ok(Json(true))
}

/// POST /api/stores/{id}/checklists/{checklist_id}/items/{item_id}/toggle
pub async fn toggle_item(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, checklist_id, item_id)): Path<(i64, i64, i64)>,
    Json(payload): Json<ChecklistItemToggle>,
) -> AppResult<Json<ShiftChecklistView>> {
    load_store(&state, &current, store_id).await?;
    let view = checklist::toggle_item(
        &state.pool,
        store_id,
        checklist_id,
        item_id,
        payload.is_done,
        Some(current.id),
    )
    .await
    .map_err(|e| match e {
        RepoError::NotFound(_) => {
            AppError::new(ErrorCode::ChecklistItemNotFound).with_detail("item_id", item_id)
        }
        other => other.into(),
    })?;
    Ok(Json(view))
}
