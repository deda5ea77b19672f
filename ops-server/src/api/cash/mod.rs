//! Cash Transaction API module
//!
//! Any user of the store may record and edit transactions; approving or
//! rejecting them is admin-only.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let store_routes = Router::new()
        .route("/api/stores/{id}/cash", get(handler::list).post(handler::create))
        .route(
            "/api/stores/{id}/cash/{transaction_id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        );

    let approval_routes = Router::new()
        .route(
            "/api/stores/{id}/cash/{transaction_id}/approve",
            post(handler::approve),
        )
        .route(
            "/api/stores/{id}/cash/{transaction_id}/reject",
            post(handler::reject),
        )
        .layer(middleware::from_fn(require_admin));

    store_routes.merge(approval_routes)
}
