//! Authentication Handlers

use std::time::Duration;

use axum::{Json, extract::State};

use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::repository::{store, user};
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{LoginRequest, LoginResponse, UserInfo, UserRole};

/// Fixed delay applied before answering a login, success or not
const AUTH_FIXED_DELAY_MS: u64 = 300;

/// POST /api/auth/login
///
/// Unknown users and wrong passwords get the same `InvalidCredentials` answer.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let username = req.username.trim().to_string();
    let found = user::find_by_username(&state.pool, &username).await?;

    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let account = match found {
        Some(account) if password::verify_password(&req.password, &account.password_hash) => account,
        Some(_) => {
            security_log!("WARN", "login_failed", username = username.clone(), reason = "invalid_password");
            return Err(AppError::invalid_credentials());
        }
        None => {
            security_log!("WARN", "login_failed", username = username.clone(), reason = "user_not_found");
            return Err(AppError::invalid_credentials());
        }
    };

    if !account.is_active {
        security_log!("WARN", "login_disabled", username = username.clone());
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    if account.role == UserRole::Store {
        let store_id = account
            .store_id
            .ok_or_else(|| AppError::internal("Store account without a store"))?;
        let active = store::find_by_id(&state.pool, store_id)
            .await?
            .is_some_and(|s| s.is_active);
        if !active {
            security_log!("WARN", "login_store_inactive", username = username.clone(), store_id = store_id);
            return Err(AppError::new(ErrorCode::StoreInactive).with_detail("store_id", store_id));
        }
    }

    let (token, expires_at) = state
        .get_jwt_service()
        .generate_token(&account)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = account.id, username = %account.username, role = account.role.as_str(), "User logged in");

    Ok(Json(LoginResponse {
        token,
        expires_at,
        user: UserInfo::from(&account),
    }))
}

/// GET /api/auth/me
pub async fn me(State(state): State<ServerState>, current: CurrentUser) -> AppResult<Json<UserInfo>> {
    let account = user::find_by_id(&state.pool, current.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(UserInfo::from(&account)))
}
