//! Shift Checklist API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/stores/{id}/checklists",
            get(handler::list).post(handler::create),
        )
        .route(
            "/api/stores/{id}/checklists/{checklist_id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/api/stores/{id}/checklists/{checklist_id}/items/{item_id}/toggle",
            post(handler::toggle_item),
        )
}
