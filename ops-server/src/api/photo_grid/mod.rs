//! Photo grid layout
//!
//! | Path | Method |
//! |------|--------|
//! | /api/stores/{id}/photo-grid | GET, PUT |

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::api::load_store;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::photo_grid;
use crate::utils::validation::{FieldErrors, MAX_SHORT_TEXT_LEN};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{MAX_GRID_SIZE, MIN_GRID_SIZE, PhotoGridConfig, PhotoGridUpdate};

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/stores/{id}/photo-grid",
        get(get_config).put(put_config),
    )
}

/// Grid sizes are 1..=6 each way and captions never outnumber the slots
fn check_layout(update: &PhotoGridUpdate) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    for (field, size) in [("columns", update.columns), ("rows", update.rows)] {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
            errors.add(field, format!("must be between {MIN_GRID_SIZE} and {MAX_GRID_SIZE}"));
        }
    }
    let slots = update.columns * update.rows;
    if errors.is_empty() && update.captions.len() as i64 > slots {
        errors.add("captions", format!("at most {slots} captions for a {}x{} grid", update.columns, update.rows));
    }
    for (i, caption) in update.captions.iter().enumerate() {
        if caption.chars().count() > MAX_SHORT_TEXT_LEN {
            errors.add(format!("captions[{i}]"), format!("is too long (max {MAX_SHORT_TEXT_LEN})"));
        }
    }
    errors.into_result().map_err(|e| AppError {
        code: ErrorCode::PhotoGridInvalid,
        ..e
    })
}

/// GET /api/stores/{id}/photo-grid - the default 2x2 layout when none was saved
pub async fn get_config(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
) -> AppResult<Json<PhotoGridConfig>> {
    load_store(&state, &current, store_id).await?;
    Ok(Json(photo_grid::get_or_default(&state.pool, store_id).await?))
}

/// PUT /api/stores/{id}/photo-grid
pub async fn put_config(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
    Json(mut payload): Json<PhotoGridUpdate>,
) -> AppResult<Json<PhotoGridConfig>> {
    check_layout(&payload)?;
    load_store(&state, &current, store_id).await?;
    payload.captions = payload.captions.iter().map(|c| c.trim().to_string()).collect();
    let saved = photo_grid::upsert(&state.pool, store_id, &payload).await?;
    tracing::info!(store_id, columns = saved.columns, rows = saved.rows, "Photo grid saved");
    Ok(Json(saved))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(columns: i64, rows: i64, captions: usize) -> PhotoGridUpdate {
        PhotoGridUpdate {
            columns,
            rows,
            captions: (0..captions).map(|i| format!("Foto {i}")).collect(),
        }
    }

    #[test]
    fn test_valid_layout() {
        assert!(check_layout(&layout(3, 2, 6)).is_ok());
        assert!(check_layout(&layout(1, 1, 0)).is_ok());
    }

    #[test]
    fn test_size_out_of_range() {
        let err = check_layout(&layout(7, 0, 0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::PhotoGridInvalid);
        assert!(err.field_error("columns").is_some());
        assert!(err.field_error("rows").is_some());
    }

    #[test]
    fn test_too_many_captions() {
        let err = check_layout(&layout(2, 2, 5)).unwrap_err();
        assert!(err.field_error("captions").is_some());
    }
}
