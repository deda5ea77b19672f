//! Shift Note API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/stores/{id}/notes", get(handler::list).post(handler::create))
        .route(
            "/api/stores/{id}/notes/{note_id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
