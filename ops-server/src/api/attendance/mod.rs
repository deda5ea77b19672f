//! Attendance API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/stores/{id}/attendance",
            get(handler::list).post(handler::create),
        )
        .route("/api/stores/{id}/attendance/summary", get(handler::summary))
        .route(
            "/api/stores/{id}/attendance/{attendance_id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
