//! Employee API module
//!
//! Creating an employee also provisions its store login.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/stores/{id}/employees",
            get(handler::list).post(handler::create),
        )
        .route(
            "/api/stores/{id}/employees/{employee_id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/api/stores/{id}/employees/{employee_id}/reset-password",
            post(handler::reset_password),
        )
}
