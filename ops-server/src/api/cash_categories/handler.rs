//! Cash Category API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{RepoError, cash_category};
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{CashCategory, CashCategoryCreate, CashCategoryUpdate, CashKind};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub kind: Option<CashKind>,
    #[serde(default)]
    pub include_inactive: bool,
}

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::CashCategoryNotFound).with_detail("category_id", id)
}

/// GET /api/cash-categories?kind=income|expense
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<CashCategory>>> {
    let rows = cash_category::find_all(&state.pool, query.kind, query.include_inactive).await?;
    Ok(Json(rows))
}

/// POST /api/cash-categories
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CashCategoryCreate>,
) -> AppResult<Json<CashCategory>> {
    validate_required_text(&payload.name, "name", MAX_SHORT_TEXT_LEN)?;
    let created = cash_category::create(&state.pool, &payload)
        .await
        .map_err(|e| e.conflict_as(ErrorCode::CashCategoryExists))?;
    tracing::info!(category_id = created.id, name = %created.name, kind = created.kind.as_str(), "Cash category created");
    Ok(Json(created))
}

/// PUT /api/cash-categories/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CashCategoryUpdate>,
) -> AppResult<Json<CashCategory>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_SHORT_TEXT_LEN)?;
    }
    let updated = cash_category::update(&state.pool, id, &payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            other => other.conflict_as(ErrorCode::CashCategoryExists),
        })?;
    Ok(Json(updated))
}

/// DELETE /api/cash-categories/{id} - only categories no transaction uses
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    if !cash_category::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(category_id = id, "Cash category deleted");
    Ok(Json(true))
}
