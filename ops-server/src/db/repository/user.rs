//! User Repository (login accounts)

use super::{RepoError, RepoResult};
use crate::auth::password::hash_password;
use shared::models::{User, UserRole};
use sqlx::{SqliteConnection, SqlitePool};

const USER_SELECT: &str = "SELECT id, username, password_hash, display_name, role, store_id, employee_id, is_active, created_at, updated_at FROM users";

/// Fields of a new login
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub display_name: &'a str,
    pub role: UserRole,
    pub store_id: Option<i64>,
    pub employee_id: Option<i64>,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE username = ? LIMIT 1");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_employee(pool: &SqlitePool, employee_id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE employee_id = ? LIMIT 1");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(employee_id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Insert a login on an open connection (used inside employee transactions)
pub async fn insert(conn: &mut SqliteConnection, data: &NewUser<'_>) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO users (username, password_hash, display_name, role, store_id, employee_id, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7) RETURNING id",
    )
    .bind(data.username)
    .bind(data.password_hash)
    .bind(data.display_name)
    .bind(data.role)
    .bind(data.store_id)
    .bind(data.employee_id)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| RepoError::from(e).on_duplicate(format!("Username {} already exists", data.username)))?;
    Ok(id)
}

pub async fn create(pool: &SqlitePool, data: &NewUser<'_>) -> RepoResult<User> {
    let mut conn = pool.acquire().await?;
    let id = insert(&mut conn, data).await?;
    drop(conn);
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn set_password(pool: &SqlitePool, id: i64, password_hash: &str) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE users SET password_hash = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(password_hash)
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(())
}

/// Create the bootstrap admin unless an active admin already exists.
/// Returns whether an account was created.
pub async fn ensure_admin(pool: &SqlitePool, username: &str, password: &str) -> RepoResult<bool> {
    let admins: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin' AND is_active = 1")
            .fetch_one(pool)
            .await?;
    if admins > 0 {
        return Ok(false);
    }
    let password_hash =
        hash_password(password).map_err(|e| RepoError::Database(format!("hash failed: {e}")))?;
    create(
        pool,
        &NewUser {
            username,
            password_hash: &password_hash,
            display_name: "Administrator",
            role: UserRole::Admin,
            store_id: None,
            employee_id: None,
        },
    )
    .await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use crate::db::repository::test_support;

    #[tokio::test]
    async fn test_ensure_admin_once() {
        let pool = test_support::pool().await;
        assert!(ensure_admin(&pool, "admin", "rahasia").await.unwrap());
        assert!(!ensure_admin(&pool, "admin2", "rahasia").await.unwrap());

        let admin = find_by_username(&pool, "admin").await.unwrap().unwrap();
        assert_eq!(admin.role, UserRole::Admin);
        assert!(verify_password("rahasia", &admin.password_hash));
        assert!(find_by_username(&pool, "admin2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_user_requires_store() {
        let pool = test_support::pool().await;
        let err = create(
            &pool,
            &NewUser {
                username: "kasir",
                password_hash: "x",
                display_name: "Kasir",
                role: UserRole::Store,
                store_id: None,
                employee_id: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_set_password() {
        let pool = test_support::pool().await;
        let store = test_support::store(&pool, "TK01").await;
        let user = create(
            &pool,
            &NewUser {
                username: "kasir",
                password_hash: "old",
                display_name: "Kasir",
                role: UserRole::Store,
                store_id: Some(store.id),
                employee_id: None,
            },
        )
        .await
        .unwrap();
        set_password(&pool, user.id, "new").await.unwrap();
        let reloaded = find_by_id(&pool, user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.password_hash, "new");
    }
}
