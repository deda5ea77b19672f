//! Employee API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::load_store;
use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::repository::{RepoError, employee};
use crate::security_log;
use crate::utils::validation::{
    FieldErrors, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, clean_optional, validate_nik,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    Employee, EmployeeAccount, EmployeeCreate, EmployeeCredentials, EmployeeUpdate,
    generated_password,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

fn validate_create(payload: &EmployeeCreate) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    errors.check(validate_nik(payload.nik.trim()));
    errors.check(validate_required_text(&payload.name, "name", MAX_NAME_LEN));
    errors.check(validate_optional_text(&payload.position, "position", MAX_SHORT_TEXT_LEN));
    errors.check(validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN));
    errors.into_result()
}

fn validate_update(payload: &EmployeeUpdate) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    if let Some(nik) = &payload.nik {
        errors.check(validate_nik(nik.trim()));
    }
    if let Some(name) = &payload.name {
        errors.check(validate_required_text(name, "name", MAX_NAME_LEN));
    }
    errors.check(validate_optional_text(&payload.position, "position", MAX_SHORT_TEXT_LEN));
    errors.check(validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN));
    errors.into_result()
}

fn hash(password: &str) -> AppResult<String> {
    password::hash_password(password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::EmployeeNotFound).with_detail("employee_id", id)
}

/// GET /api/stores/{id}/employees
pub async fn list(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Employee>>> {
    load_store(&state, &current, store_id).await?;
    let employees = employee::find_by_store(&state.pool, store_id, query.include_inactive).await?;
    Ok(Json(employees))
}

/// GET /api/stores/{id}/employees/{employee_id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<Employee>> {
    load_store(&state, &current, store_id).await?;
    let found = employee::find_by_id(&state.pool, store_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(found))
}

/// POST /api/stores/{id}/employees
///
/// Returns the employee with its login; the initial password is only ever
/// shown in this response.
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(store_id): Path<i64>,
    Json(mut payload): Json<EmployeeCreate>,
) -> AppResult<Json<EmployeeAccount>> {
    validate_create(&payload)?;
    let store = load_store(&state, &current, store_id).await?;
    payload.nik = payload.nik.trim().to_string();
    payload.position = clean_optional(payload.position);
    payload.phone = clean_optional(payload.phone);

    let initial_password = generated_password(&store.code, &payload.nik);
    let password_hash = hash(&initial_password)?;
    let (created, user_id) = employee::create(&state.pool, store_id, &payload, &password_hash)
        .await
        .map_err(|e| e.conflict_as(ErrorCode::EmployeeNikExists))?;

    tracing::info!(store_id, employee_id = created.id, user_id, by = current.id, "Employee created");

    Ok(Json(EmployeeAccount {
        credentials: EmployeeCredentials {
            user_id,
            username: created.nik.clone(),
            initial_password,
        },
        employee: created,
    }))
}

/// PUT /api/stores/{id}/employees/{employee_id}
pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<Employee>> {
    validate_update(&payload)?;
    load_store(&state, &current, store_id).await?;
    let updated = employee::update(&state.pool, store_id, id, &payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            other => other.conflict_as(ErrorCode::EmployeeNikExists),
        })?;
    tracing::info!(store_id, employee_id = id, by = current.id, "Employee updated");
    Ok(Json(updated))
}

/// DELETE /api/stores/{id}/employees/{employee_id}
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    load_store(&state, &current, store_id).await?;
    if !employee::delete(&state.pool, store_id, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(store_id, employee_id = id, by = current.id, "Employee deleted");
    Ok(Json(true))
}

/// POST /api/stores/{id}/employees/{employee_id}/reset-password
///
/// Puts the login back on the generated password, creating the login if it is missing.
pub async fn reset_password(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path((store_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<EmployeeCredentials>> {
    let store = load_store(&state, &current, store_id).await?;
    let target = employee::find_by_id(&state.pool, store_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if !target.is_active {
        return Err(AppError::new(ErrorCode::EmployeeInactive).with_detail("employee_id", id));
    }

    let initial_password = generated_password(&store.code, &target.nik);
    let login = employee::reset_login(&state.pool, &target, &hash(&initial_password)?)
        .await
        .map_err(|e| e.conflict_as(ErrorCode::UsernameExists))?;

    security_log!("INFO", "password_reset", user_id = login.id, employee_id = id, by = current.id);

    Ok(Json(EmployeeCredentials {
        user_id: login.id,
        username: login.username,
        initial_password,
    }))
}
