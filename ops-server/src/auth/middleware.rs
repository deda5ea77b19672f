//! Authentication middleware
//!
//! Axum middleware for JWT authentication and role checks

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use shared::ErrorCode;

/// Paths under `/api` reachable without a token
const PUBLIC_API_ROUTES: &[&str] = &["/api/auth/login"];

/// Authentication middleware
///
/// Extracts and validates the JWT from `Authorization: Bearer <token>` and
/// inserts [`CurrentUser`] into the request extensions.
///
/// # Skipped
///
/// - `OPTIONS *` (CORS preflight)
/// - paths outside `/api/` (health, unknown routes fall through to 404)
/// - `/api/auth/login`
///
/// # Errors
///
/// | Case | Code |
/// |------|------|
/// | no Authorization header | NotAuthenticated (401) |
/// | expired token | TokenExpired (401) |
/// | anything else | TokenInvalid (401) |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if needs_token(req.method(), req.uri().path()) {
        let user = authenticate(&state, &req)?;
        req.extensions_mut().insert(user);
    }
    Ok(next.run(req).await)
}

fn needs_token(method: &http::Method, path: &str) -> bool {
    method != http::Method::OPTIONS
        && path.starts_with("/api/")
        && !PUBLIC_API_ROUTES.contains(&path)
}

/// Resolve the bearer token of `req` into the caller
fn authenticate(state: &ServerState, req: &Request) -> Result<CurrentUser, AppError> {
    let uri = req.uri().to_string();
    let Some(header) = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        security_log!("WARN", "auth_missing", uri = uri);
        return Err(AppError::unauthorized());
    };
    let token = JwtService::extract_from_header(header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

    let claims = state.jwt_service.validate_token(token).map_err(|e| {
        security_log!("WARN", "auth_failed", error = e.to_string(), uri = uri.clone());
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    CurrentUser::try_from(claims)
        .map_err(|e| AppError::invalid_token(format!("Malformed token claims: {e}")))
}

/// Admin middleware - requires the `admin` role
///
/// Non-admins get 403 AdminRequired
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id,
            username = user.username.clone(),
            uri = format!("{:?}", req.uri())
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}

/// Reject callers scoped to a different store
pub fn ensure_store_access(user: &CurrentUser, store_id: i64) -> Result<(), AppError> {
    if user.can_access_store(store_id) {
        return Ok(());
    }
    security_log!(
        "WARN",
        "store_access_denied",
        user_id = user.id,
        username = user.username.clone(),
        store_id = store_id
    );
    Err(AppError::new(ErrorCode::StoreAccessDenied).with_detail("store_id", store_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::UserRole;

    fn store_user(store_id: i64) -> CurrentUser {
        CurrentUser {
            id: 2,
            username: "kasir".into(),
            role: UserRole::Store,
            store_id: Some(store_id),
        }
    }

    #[test]
    fn test_store_scope() {
        assert!(ensure_store_access(&store_user(1), 1).is_ok());
        let err = ensure_store_access(&store_user(1), 2).unwrap_err();
        assert_eq!(err.code, ErrorCode::StoreAccessDenied);
        assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_public_paths_skip_token() {
        assert!(!needs_token(&http::Method::POST, "/api/auth/login"));
        assert!(!needs_token(&http::Method::GET, "/health"));
        assert!(!needs_token(&http::Method::OPTIONS, "/api/stores"));
        assert!(needs_token(&http::Method::GET, "/api/auth/me"));
        assert!(needs_token(&http::Method::GET, "/api/stores/1/cash"));
    }

    #[test]
    fn test_admin_scope() {
        let admin = CurrentUser {
            id: 1,
            username: "admin".into(),
            role: UserRole::Admin,
            store_id: None,
        };
        assert!(ensure_store_access(&admin, 42).is_ok());
    }
}
