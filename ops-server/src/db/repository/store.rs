//! Store Repository

use super::{RepoError, RepoResult};
use shared::models::{Store, StoreCreate, StoreUpdate};
use sqlx::SqlitePool;

const STORE_SELECT: &str = "SELECT id, code, name, area, address, phone, photo, is_active, created_at, updated_at FROM stores";

pub async fn find_all(pool: &SqlitePool, include_inactive: bool) -> RepoResult<Vec<Store>> {
    let sql = format!("{STORE_SELECT} WHERE (?1 OR is_active = 1) ORDER BY code");
    let stores = sqlx::query_as::<_, Store>(&sql)
        .bind(include_inactive)
        .fetch_all(pool)
        .await?;
    Ok(stores)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Store>> {
    let sql = format!("{STORE_SELECT} WHERE id = ?");
    let store = sqlx::query_as::<_, Store>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(store)
}

pub async fn find_by_code(pool: &SqlitePool, code: &str) -> RepoResult<Option<Store>> {
    let sql = format!("{STORE_SELECT} WHERE code = ? LIMIT 1");
    let store = sqlx::query_as::<_, Store>(&sql)
        .bind(code)
        .fetch_optional(pool)
        .await?;
    Ok(store)
}

pub async fn create(pool: &SqlitePool, data: &StoreCreate) -> RepoResult<Store> {
    let now = shared::util::now_millis();
    let code = data.code.trim();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO stores (code, name, area, address, phone, photo, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7) RETURNING id",
    )
    .bind(code)
    .bind(data.name.trim())
    .bind(&data.area)
    .bind(&data.address)
    .bind(&data.phone)
    .bind(&data.photo)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| RepoError::from(e).on_duplicate(format!("Store code {code} already exists")))?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create store".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &StoreUpdate) -> RepoResult<Store> {
    let now = shared::util::now_millis();
    let code = data.code.as_deref().map(str::trim);
    let rows = sqlx::query(
        "UPDATE stores SET code = COALESCE(?1, code), name = COALESCE(?2, name), \
         area = COALESCE(?3, area), address = COALESCE(?4, address), phone = COALESCE(?5, phone), \
         photo = COALESCE(?6, photo), is_active = COALESCE(?7, is_active), updated_at = ?8 WHERE id = ?9",
    )
    .bind(code)
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.area)
    .bind(&data.address)
    .bind(&data.phone)
    .bind(&data.photo)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| {
        RepoError::from(e).on_duplicate(format!(
            "Store code {} already exists",
            code.unwrap_or_default()
        ))
    })?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Store {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Store {id} not found")))
}

/// Delete a store; employees, logins and every store-scoped record cascade
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM stores WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support;

    #[tokio::test]
    async fn test_store_crud() {
        let pool = test_support::pool().await;
        let store = test_support::store(&pool, "TK01").await;
        assert!(store.is_active);
        assert_eq!(store.display_name(), "TK01 - Toko TK01");

        let updated = update(
            &pool,
            store.id,
            &StoreUpdate {
                name: Some("Sudirman".into()),
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Sudirman");
        assert_eq!(updated.area.as_deref(), Some("Jakarta"));
        assert!(!updated.is_active);

        assert!(find_all(&pool, false).await.unwrap().is_empty());
        assert_eq!(find_all(&pool, true).await.unwrap().len(), 1);
        assert!(find_by_code(&pool, "TK01").await.unwrap().is_some());

        assert!(delete(&pool, store.id).await.unwrap());
        assert!(find_by_id(&pool, store.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code() {
        let pool = test_support::pool().await;
        test_support::store(&pool, "TK01").await;
        let err = create(
            &pool,
            &StoreCreate {
                code: "TK01".into(),
                name: "Lain".into(),
                area: None,
                address: None,
                phone: None,
                photo: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(msg) if msg.contains("TK01")));
    }

    #[tokio::test]
    async fn test_update_missing_store() {
        let pool = test_support::pool().await;
        let err = update(&pool, 404, &StoreUpdate::default()).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
