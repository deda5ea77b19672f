//! Store dashboard
//!
//! | Path | Method |
//! |------|--------|
//! | /api/stores/{id}/dashboard?month=YYYY-MM | GET |

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::api::targets::compute_progress;
use crate::api::{MonthQuery, load_store};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{attendance, balance};
use crate::utils::AppResult;
use crate::utils::time::month_date_range;
use shared::models::{AttendanceCounts, SHIFTS, StoreDashboard};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/stores/{id}/dashboard", get(dashboard))
}

/// Sales progress (whole store and per shift), attendance and cash for one month
pub async fn dashboard(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<StoreDashboard>> {
    let store = load_store(&state, &current, store_id).await?;
    let month = query.resolve()?;
    let (from, to) = month_date_range(&month)?;

    let sales = compute_progress(&state, store_id, &month, None).await?;
    let mut shifts = Vec::with_capacity(SHIFTS.len());
    for shift in SHIFTS {
        shifts.push(compute_progress(&state, store_id, &month, Some(shift)).await?);
    }

    let summaries = attendance::summary(&state.pool, store_id, &from, &to).await?;
    let cash = balance::month_summary(&state.pool, store_id, &from, &to).await?;

    Ok(Json(StoreDashboard {
        store_id,
        store_code: store.code,
        store_name: store.name,
        month,
        sales,
        shifts,
        attendance: AttendanceCounts::from_summaries(&summaries),
        cash,
    }))
}
