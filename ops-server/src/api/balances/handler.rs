//! Cash Balance API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::api::{MonthQuery, load_store};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::balance;
use crate::utils::AppResult;
use crate::utils::time::{month_date_range, normalize_date};
use shared::models::{CashBalance, CashMonthSummary};

#[derive(Debug, Serialize)]
pub struct BalanceMonth {
    pub month: String,
    pub days: Vec<CashBalance>,
    pub summary: CashMonthSummary,
}

/// Without `from` the whole chain of the store is rebuilt
#[derive(Debug, Default, Deserialize)]
pub struct RecomputeQuery {
    pub from: Option<String>,
}

/// GET /api/stores/{id}/balances?month=YYYY-MM
pub async fn list(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<BalanceMonth>> {
    load_store(&state, &current, store_id).await?;
    let month = query.resolve()?;
    let (from, to) = month_date_range(&month)?;
    let days = balance::find_range(&state.pool, store_id, &from, &to).await?;
    let summary = balance::month_summary(&state.pool, store_id, &from, &to).await?;
    Ok(Json(BalanceMonth { month, days, summary }))
}

/// POST /api/stores/{id}/balances/recompute?from=YYYY-MM-DD
pub async fn recompute(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
    Query(query): Query<RecomputeQuery>,
) -> AppResult<Json<bool>> {
    load_store(&state, &current, store_id).await?;
    match &query.from {
        Some(from) => {
            let from = normalize_date("from", from)?;
            balance::recompute(&state.pool, store_id, &from).await?;
        }
        None => balance::recompute_all(&state.pool, store_id).await?,
    }
    tracing::info!(store_id, from = ?query.from, by = current.id, "Cash balances recomputed");
    Ok(Json(true))
}
