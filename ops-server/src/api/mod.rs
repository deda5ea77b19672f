//! API routes
//!
//! # Layout
//!
//! - [`health`] - liveness probe
//! - [`auth`] - login and current user
//! - [`stores`] - store master data
//! - [`employees`] - employees and their logins
//! - [`attendance`] - daily attendance and monthly summary
//! - [`cash_categories`] - cash category master data
//! - [`cash`] - cash transactions and approval
//! - [`balances`] - daily cash balance rollup
//! - [`reports`] - monthly shift reports and exports
//! - [`targets`] - KPI targets and progress
//! - [`notes`] - shift handover notes
//! - [`checklists`] - shift checklists
//! - [`photo_grid`] - store photo grid layout
//! - [`dashboard`] - monthly store summary
//!
//! Every store-scoped route lives under `/api/stores/{id}` and checks the
//! caller's store scope through [`load_store`].

pub mod health;
pub mod auth;

pub mod stores;
pub mod employees;
pub mod attendance;

pub mod cash_categories;
pub mod cash;
pub mod balances;

pub mod reports;
pub mod targets;
pub mod dashboard;

pub mod notes;
pub mod checklists;
pub mod photo_grid;

use axum::Router;
use axum::middleware as axum_middleware;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{CurrentUser, ensure_store_access, require_auth};
use crate::core::ServerState;
use crate::db::repository::store;
use crate::utils::time::{current_month, normalize_month};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::Store;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(stores::router())
        .merge(employees::router())
        .merge(attendance::router())
        .merge(cash_categories::router())
        .merge(cash::router())
        .merge(balances::router())
        .merge(reports::router())
        .merge(targets::router())
        .merge(dashboard::router())
        .merge(notes::router())
        .merge(checklists::router())
        .merge(photo_grid::router())
}

/// Build the application with middleware
///
/// Used by both the HTTP server and integration tests
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Resolve a store the caller may act on
pub(crate) async fn load_store(state: &ServerState, user: &CurrentUser, store_id: i64) -> AppResult<Store> {
    ensure_store_access(user, store_id)?;
    store::find_by_id(&state.pool, store_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::StoreNotFound).with_detail("store_id", store_id))
}

/// `?month=YYYY-MM`, defaulting to the current month
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

impl MonthQuery {
    pub fn resolve(&self) -> AppResult<String> {
        match self.month.as_deref().filter(|m| !m.trim().is_empty()) {
            Some(month) => normalize_month("month", month),
            None => Ok(current_month()),
        }
    }
}
