//! Shift Note API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::load_store;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, shift_note, user};
use crate::utils::time::normalize_date;
use crate::utils::validation::{FieldErrors, MAX_CONTENT_LEN, validate_required_text, validate_shift};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{ShiftNote, ShiftNoteCreate, ShiftNoteUpdate};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub date: Option<String>,
    pub shift: Option<i64>,
}

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::NoteNotFound).with_detail("note_id", id)
}

/// GET /api/stores/{id}/notes?date=&shift=
pub async fn list(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ShiftNote>>> {
    load_store(&state, &current, store_id).await?;
    let date = query
        .date
        .as_deref()
        .map(|d| normalize_date("date", d))
        .transpose()?;
    let notes = shift_note::find_by_store(&state.pool, store_id, date.as_deref(), query.shift).await?;
    Ok(Json(notes))
}

/// GET /api/stores/{id}/notes/{note_id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<ShiftNote>> {
    load_store(&state, &current, store_id).await?;
    let note = shift_note::find_by_id(&state.pool, store_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(note))
}

/// POST /api/stores/{id}/notes - the author is the caller
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
    Json(mut payload): Json<ShiftNoteCreate>,
) -> AppResult<Json<ShiftNote>> {
    let mut errors = FieldErrors::new();
    let date = errors.check(normalize_date("date", &payload.date));
    errors.check(validate_shift(payload.shift));
    errors.check(validate_required_text(&payload.content, "content", MAX_CONTENT_LEN));
    errors.into_result()?;
    if let Some(date) = date {
        payload.date = date;
    }

    load_store(&state, &current, store_id).await?;
    let author_name = user::find_by_id(&state.pool, current.id)
        .await?
        .map(|u| u.display_name)
        .unwrap_or_else(|| current.username.clone());
    let note = shift_note::create(&state.pool, store_id, &payload, Some(current.id), &author_name).await?;
    Ok(Json(note))
}

/// PUT /api/stores/{id}/notes/{note_id}
pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
    Json(payload): Json<ShiftNoteUpdate>,
) -> AppResult<Json<ShiftNote>> {
    let mut errors = FieldErrors::new();
    if let Some(shift) = payload.shift {
        errors.check(validate_shift(shift));
    }
    if let Some(content) = &payload.content {
        errors.check(validate_required_text(content, "content", MAX_CONTENT_LEN));
    }
    errors.into_result()?;

    load_store(&state, &current, store_id).await?;
    let note = shift_note::update(&state.pool, store_id, id, &payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            other => other.into(),
        })?;
    Ok(Json(note))
}

/// DELETE /api/stores/{id}/notes/{note_id}
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    load_store(&state, &current, store_id).await?;
    if !shift_note::delete(&state.pool, store_id, id).await? {
        return Err(not_found(id));
    }
    Ok(Json(true))
}
