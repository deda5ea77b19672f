//! KPI Target API module

mod handler;

pub(crate) use handler::compute_progress;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/stores/{id}/targets",
            get(handler::list).post(handler::create),
        )
        .route("/api/stores/{id}/targets/progress", get(handler::progress))
        .route(
            "/api/stores/{id}/targets/{target_id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
