//! Shift Report API module
//!
//! Reports are written together with their daily rows; exports render the
//! same rows through `ops-report`.

mod export;
mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/stores/{id}/reports",
            get(handler::list).post(handler::create),
        )
        .route(
            "/api/stores/{id}/reports/{report_id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/api/stores/{id}/reports/{report_id}/export/pdf",
            get(export::pdf),
        )
        .route(
            "/api/stores/{id}/reports/{report_id}/export/xlsx",
            get(export::xlsx),
        )
}
