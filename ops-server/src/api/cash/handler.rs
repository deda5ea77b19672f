//! Cash Transaction API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::load_store;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::cash::{self, CashFilter};
use crate::db::repository::{RepoError, cash_category};
use crate::utils::time::{month_date_range, normalize_date};
use crate::utils::validation::{FieldErrors, MAX_NOTE_LEN, clean_optional, validate_amount, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    ApprovalStatus, CashCategory, CashKind, CashTransaction, CashTransactionCreate,
    CashTransactionUpdate,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub month: Option<String>,
    pub status: Option<ApprovalStatus>,
    pub kind: Option<CashKind>,
}

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::CashTransactionNotFound).with_detail("transaction_id", id)
}

fn map_repo_error(id: i64) -> impl FnOnce(RepoError) -> AppError {
    move |e| match e {
        RepoError::NotFound(_) => not_found(id),
        other => other.conflict_as(ErrorCode::TransactionNotPending),
    }
}

/// Category must exist, be active and match the transaction kind
async fn usable_category(state: &ServerState, category_id: i64, kind: CashKind) -> AppResult<CashCategory> {
    let category = cash_category::find_by_id(&state.pool, category_id)
        .await?
        .filter(|c| c.is_active)
        .ok_or_else(|| {
            AppError::new(ErrorCode::CashCategoryNotFound).with_field_error("category_id", "unknown or inactive category")
        })?;
    if category.kind != kind {
        return Err(AppError::new(ErrorCode::CategoryKindMismatch).with_field_error(
            "category_id",
            format!("category {} is for {}", category.name, category.kind.as_str()),
        ));
    }
    Ok(category)
}

/// GET /api/stores/{id}/cash?month=&status=&kind=
pub async fn list(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<CashTransaction>>> {
    load_store(&state, &current, store_id).await?;
    let (date_from, date_to) = match &query.month {
        Some(month) => {
            let (from, to) = month_date_range(month)?;
            (Some(from), Some(to))
        }
        None => (None, None),
    };
    let filter = CashFilter {
        date_from,
        date_to,
        status: query.status,
        kind: query.kind,
    };
    Ok(Json(cash::find_by_store(&state.pool, store_id, &filter).await?))
}

/// GET /api/stores/{id}/cash/{transaction_id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<CashTransaction>> {
    load_store(&state, &current, store_id).await?;
    let row = cash::find_by_id(&state.pool, store_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(row))
}

/// POST /api/stores/{id}/cash - new transactions start pending
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
    Json(mut payload): Json<CashTransactionCreate>,
) -> AppResult<Json<CashTransaction>> {
    let mut errors = FieldErrors::new();
    let date = errors.check(normalize_date("transaction_date", &payload.transaction_date));
    errors.check(validate_amount("amount", payload.amount));
    errors.check(validate_optional_text(&payload.description, "description", MAX_NOTE_LEN));
    errors.into_result()?;

    load_store(&state, &current, store_id).await?;
    usable_category(&state, payload.category_id, payload.kind).await?;

    if let Some(date) = date {
        payload.transaction_date = date;
    }
    payload.description = clean_optional(payload.description);

    let created = cash::create(&state.pool, store_id, &payload, Some(current.id))
        .await
        .map_err(|e| e.conflict_as(ErrorCode::ReferenceNoExists))?;
    tracing::info!(
        store_id,
        transaction_id = created.id,
        reference_no = %created.reference_no,
        kind = created.kind.as_str(),
        amount = created.amount,
        "Cash transaction recorded"
    );
    Ok(Json(created))
}

/// PUT /api/stores/{id}/cash/{transaction_id}
pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
    Json(mut payload): Json<CashTransactionUpdate>,
) -> AppResult<Json<CashTransaction>> {
    let mut errors = FieldErrors::new();
    let date = match &payload.transaction_date {
        Some(date) => errors.check(normalize_date("transaction_date", date)),
        None => None,
    };
    if let Some(amount) = payload.amount {
        errors.check(validate_amount("amount", amount));
    }
    errors.check(validate_optional_text(&payload.description, "description", MAX_NOTE_LEN));
    errors.into_result()?;

    load_store(&state, &current, store_id).await?;
    let existing = cash::find_by_id(&state.pool, store_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if let Some(category_id) = payload.category_id {
        usable_category(&state, category_id, existing.kind).await?;
    }
    if date.is_some() {
        payload.transaction_date = date;
    }

    let updated = cash::update(&state.pool, store_id, id, &payload)
        .await
        .map_err(map_repo_error(id))?;
    tracing::info!(store_id, transaction_id = id, status = updated.status.as_str(), "Cash transaction updated");
    Ok(Json(updated))
}

/// DELETE /api/stores/{id}/cash/{transaction_id}
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    load_store(&state, &current, store_id).await?;
    if !cash::delete(&state.pool, store_id, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(store_id, transaction_id = id, by = current.id, "Cash transaction deleted");
    Ok(Json(true))
}

async fn decide(
    state: &ServerState,
    current: &CurrentUser,
    store_id: i64,
    id: i64,
    status: ApprovalStatus,
) -> AppResult<CashTransaction> {
    load_store(state, current, store_id).await?;
    let decided = cash::set_status(&state.pool, store_id, id, status, Some(current.id))
        .await
        .map_err(map_repo_error(id))?;
    tracing::info!(
        store_id,
        transaction_id = id,
        status = status.as_str(),
        by = current.id,
        "Cash transaction decided"
    );
    Ok(decided)
}

/// POST /api/stores/{id}/cash/{transaction_id}/approve
///
/// Approval feeds the amount into the daily balance chain.
pub async fn approve(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<CashTransaction>> {
    Ok(Json(decide(&state, &current, store_id, id, ApprovalStatus::Approved).await?))
}

/// POST /api/stores/{id}/cash/{transaction_id}/reject
pub async fn reject(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<CashTransaction>> {
    Ok(Json(decide(&state, &current, store_id, id, ApprovalStatus::Rejected).await?))
}
