//! Employee Repository
//!
//! Every employee owns one store login whose username is the NIK. Creating,
//! renaming, deactivating and deleting an employee keep that login in step.

use super::user::{self, NewUser};
use super::{RepoError, RepoResult};
use shared::models::{Employee, EmployeeCreate, EmployeeUpdate, User, UserRole};
use sqlx::SqlitePool;

const EMPLOYEE_SELECT: &str = "SELECT id, store_id, nik, name, position, phone, is_active, created_at, updated_at FROM employees";

fn nik_taken(nik: &str) -> String {
    format!("NIK {nik} is already registered")
}

pub async fn find_by_store(
    pool: &SqlitePool,
    store_id: i64,
    include_inactive: bool,
) -> RepoResult<Vec<Employee>> {
    let sql = format!("{EMPLOYEE_SELECT} WHERE store_id = ?1 AND (?2 OR is_active = 1) ORDER BY name");
    let employees = sqlx::query_as::<_, Employee>(&sql)
        .bind(store_id)
        .bind(include_inactive)
        .fetch_all(pool)
        .await?;
    Ok(employees)
}

pub async fn find_by_id(pool: &SqlitePool, store_id: i64, id: i64) -> RepoResult<Option<Employee>> {
    let sql = format!("{EMPLOYEE_SELECT} WHERE id = ?1 AND store_id = ?2");
    let employee = sqlx::query_as::<_, Employee>(&sql)
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await?;
    Ok(employee)
}

/// Insert the employee and its login in one transaction.
/// Returns the employee and the new user id.
pub async fn create(
    pool: &SqlitePool,
    store_id: i64,
    data: &EmployeeCreate,
    password_hash: &str,
) -> RepoResult<(Employee, i64)> {
    let now = shared::util::now_millis();
    let nik = data.nik.trim();
    let name = data.name.trim();
    let mut tx = pool.begin().await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO employees (store_id, nik, name, position, phone, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6) RETURNING id",
    )
    .bind(store_id)
    .bind(nik)
    .bind(name)
    .bind(&data.position)
    .bind(&data.phone)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| RepoError::from(e).on_duplicate(nik_taken(nik)))?;

    let user_id = user::insert(
        &mut tx,
        &NewUser {
            username: nik,
            password_hash,
            display_name: name,
            role: UserRole::Store,
            store_id: Some(store_id),
            employee_id: Some(id),
        },
    )
    .await
    .map_err(|e| e.on_duplicate(format!("Login {nik} already exists")))?;

    tx.commit().await?;

    let employee = find_by_id(pool, store_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee".into()))?;
    Ok((employee, user_id))
}

/// Update the employee; NIK, name and active flag are mirrored onto the login
pub async fn update(
    pool: &SqlitePool,
    store_id: i64,
    id: i64,
    data: &EmployeeUpdate,
) -> RepoResult<Employee> {
    let now = shared::util::now_millis();
    let nik = data.nik.as_deref().map(str::trim);
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE employees SET nik = COALESCE(?1, nik), name = COALESCE(?2, name), \
         position = COALESCE(?3, position), phone = COALESCE(?4, phone), \
         is_active = COALESCE(?5, is_active), updated_at = ?6 WHERE id = ?7 AND store_id = ?8",
    )
    .bind(nik)
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.position)
    .bind(&data.phone)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .bind(store_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| RepoError::from(e).on_duplicate(nik_taken(nik.unwrap_or_default())))?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }

    sqlx::query(
        "UPDATE users SET username = COALESCE(?1, username), display_name = COALESCE(?2, display_name), \
         is_active = COALESCE(?3, is_active), updated_at = ?4 WHERE employee_id = ?5",
    )
    .bind(nik)
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        RepoError::from(e).on_duplicate(format!("Login {} already exists", nik.unwrap_or_default()))
    })?;

    tx.commit().await?;

    find_by_id(pool, store_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))
}

/// Delete the employee; the login and attendance rows cascade
pub async fn delete(pool: &SqlitePool, store_id: i64, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM employees WHERE id = ?1 AND store_id = ?2")
        .bind(id)
        .bind(store_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Set a new password on the employee's login, provisioning the login if it is missing
pub async fn reset_login(
    pool: &SqlitePool,
    employee: &Employee,
    password_hash: &str,
) -> RepoResult<User> {
    let user_id = match user::find_by_employee(pool, employee.id).await? {
        Some(existing) => {
            user::set_password(pool, existing.id, password_hash).await?;
            existing.id
        }
        None => {
            let mut conn = pool.acquire().await?;
            user::insert(
                &mut conn,
                &NewUser {
                    username: &employee.nik,
                    password_hash,
                    display_name: &employee.name,
                    role: UserRole::Store,
                    store_id: Some(employee.store_id),
                    employee_id: Some(employee.id),
                },
            )
            .await?
        }
    };
    user::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {user_id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support;

    fn payload(nik: &str, name: &str) -> EmployeeCreate {
        EmployeeCreate {
            nik: nik.into(),
            name: name.into(),
            position: Some("Kasir".into()),
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_create_provisions_login() {
        let pool = test_support::pool().await;
        let store = test_support::store(&pool, "TK01").await;
        let (employee, user_id) = create(&pool, store.id, &payload("3201010101900123", "Sari"), "hash")
            .await
            .unwrap();
        assert_eq!(employee.nik, "3201010101900123");

        let login = user::find_by_id(&pool, user_id).await.unwrap().unwrap();
        assert_eq!(login.username, "3201010101900123");
        assert_eq!(login.role, UserRole::Store);
        assert_eq!(login.store_id, Some(store.id));
        assert_eq!(login.employee_id, Some(employee.id));
    }

    #[tokio::test]
    async fn test_duplicate_nik_rolls_back() {
        let pool = test_support::pool().await;
        let store = test_support::store(&pool, "TK01").await;
        create(&pool, store.id, &payload("3201010101900123", "Sari"), "hash")
            .await
            .unwrap();
        let err = create(&pool, store.id, &payload("3201010101900123", "Budi"), "hash")
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(msg) if msg.contains("3201010101900123")));
        assert_eq!(find_by_store(&pool, store.id, true).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deactivate_disables_login() {
        let pool = test_support::pool().await;
        let store = test_support::store(&pool, "TK01").await;
        let (employee, user_id) = create(&pool, store.id, &payload("3201010101900123", "Sari"), "hash")
            .await
            .unwrap();
        let updated = update(
            &pool,
            store.id,
            employee.id,
            &EmployeeUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(!updated.is_active);
        let login = user::find_by_id(&pool, user_id).await.unwrap().unwrap();
        assert!(!login.is_active);
        assert!(find_by_store(&pool, store.id, false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_other_store_cannot_see_employee() {
        let pool = test_support::pool().await;
        let a = test_support::store(&pool, "TK01").await;
        let b = test_support::store(&pool, "TK02").await;
        let (employee, _) = create(&pool, a.id, &payload("3201010101900123", "Sari"), "hash")
            .await
            .unwrap();
        assert!(find_by_id(&pool, b.id, employee.id).await.unwrap().is_none());
        assert!(!delete(&pool, b.id, employee.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_cascades_login() {
        let pool = test_support::pool().await;
        let store = test_support::store(&pool, "TK01").await;
        let (employee, user_id) = create(&pool, store.id, &payload("3201010101900123", "Sari"), "hash")
            .await
            .unwrap();
        assert!(delete(&pool, store.id, employee.id).await.unwrap());
        assert!(user::find_by_id(&pool, user_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reset_login() {
        let pool = test_support::pool().await;
        let store = test_support::store(&pool, "TK01").await;
        let (employee, user_id) = create(&pool, store.id, &payload("3201010101900123", "Sari"), "old")
            .await
            .unwrap();
        let login = reset_login(&pool, &employee, "new").await.unwrap();
        assert_eq!(login.id, user_id);
        assert_eq!(login.password_hash, "new");
    }
}
