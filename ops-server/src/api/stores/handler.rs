//! Store API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::load_store;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::store;
use crate::utils::validation::{
    FieldErrors, MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, clean_optional,
    validate_optional_text, validate_required_text, validate_store_code,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Store, StoreCreate, StoreUpdate};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

fn validate_create(payload: &StoreCreate) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    errors.check(validate_store_code(&payload.code));
    errors.check(validate_required_text(&payload.name, "name", MAX_NAME_LEN));
    errors.check(validate_optional_text(&payload.area, "area", MAX_SHORT_TEXT_LEN));
    errors.check(validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN));
    errors.check(validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN));
    errors.check(validate_optional_text(&payload.photo, "photo", MAX_URL_LEN));
    errors.into_result()
}

fn validate_update(payload: &StoreUpdate) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    if let Some(code) = &payload.code {
        errors.check(validate_store_code(code));
    }
    if let Some(name) = &payload.name {
        errors.check(validate_required_text(name, "name", MAX_NAME_LEN));
    }
    errors.check(validate_optional_text(&payload.area, "area", MAX_SHORT_TEXT_LEN));
    errors.check(validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN));
    errors.check(validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN));
    errors.check(validate_optional_text(&payload.photo, "photo", MAX_URL_LEN));
    errors.into_result()
}

/// GET /api/stores - admins see every store, store accounts only their own
pub async fn list(
    State(state): State<ServerState>,
    current: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Store>>> {
    let stores = store::find_all(&state.pool, query.include_inactive).await?;
    let visible = stores
        .into_iter()
        .filter(|s| current.can_access_store(s.id))
        .collect();
    Ok(Json(visible))
}

/// GET /api/stores/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Store>> {
    Ok(Json(load_store(&state, &current, id).await?))
}

/// POST /api/stores
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(mut payload): Json<StoreCreate>,
) -> AppResult<Json<Store>> {
    validate_create(&payload)?;
    payload.area = clean_optional(payload.area);
    payload.address = clean_optional(payload.address);
    payload.phone = clean_optional(payload.phone);
    payload.photo = clean_optional(payload.photo);

    let created = store::create(&state.pool, &payload)
        .await
        .map_err(|e| e.conflict_as(ErrorCode::StoreCodeExists))?;
    tracing::info!(store_id = created.id, code = %created.code, by = current.id, "Store created");
    Ok(Json(created))
}

/// PUT /api/stores/{id}
pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<StoreUpdate>,
) -> AppResult<Json<Store>> {
    validate_update(&payload)?;
    load_store(&state, &current, id).await?;
    let updated = store::update(&state.pool, id, &payload)
        .await
        .map_err(|e| e.conflict_as(ErrorCode::StoreCodeExists))?;
    tracing::info!(store_id = id, by = current.id, "Store updated");
    Ok(Json(updated))
}

/// DELETE /api/stores/{id} - cascades to every store-scoped record
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = store::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::new(ErrorCode::StoreNotFound).with_detail("store_id", id));
    }
    tracing::warn!(store_id = id, by = current.id, "Store deleted");
    Ok(Json(deleted))
}
