//! Cash Balance API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/stores/{id}/balances", get(handler::list))
        .route("/api/stores/{id}/balances/recompute", post(handler::recompute))
}
