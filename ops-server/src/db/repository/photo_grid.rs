//! Photo Grid Repository
//!
//! One layout row per store. Stores without a row get the default layout.

use super::RepoResult;
use shared::models::{PhotoGridConfig, PhotoGridUpdate};
use sqlx::SqlitePool;

pub async fn find(pool: &SqlitePool, store_id: i64) -> RepoResult<Option<PhotoGridConfig>> {
    let row = sqlx::query_as::<_, PhotoGridConfig>(
        "SELECT store_id, grid_columns AS \"columns\", grid_rows AS \"rows\", captions, updated_at \
         FROM photo_grid_configs WHERE store_id = ?",
    )
    .bind(store_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn get_or_default(pool: &SqlitePool, store_id: i64) -> RepoResult<PhotoGridConfig> {
    Ok(find(pool, store_id)
        .await?
        .unwrap_or_else(|| PhotoGridConfig::default_for(store_id)))
}

/// Insert or replace the store's layout
pub async fn upsert(pool: &SqlitePool, store_id: i64, data: &PhotoGridUpdate) -> RepoResult<PhotoGridConfig> {
    let captions = serde_json::to_string(&data.captions)
        .map_err(|e| super::RepoError::Validation(format!("Invalid captions: {e}")))?;
    sqlx::query(
        "INSERT INTO photo_grid_configs (store_id, grid_columns, grid_rows, captions, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5) \
         ON CONFLICT(store_id) DO UPDATE SET grid_columns = excluded.grid_columns, \
         grid_rows = excluded.grid_rows, captions = excluded.captions, updated_at = excluded.updated_at",
    )
    .bind(store_id)
    .bind(data.columns)
    .bind(data.rows)
    .bind(captions)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await?;
    get_or_default(pool, store_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{RepoError, test_support};

    #[tokio::test]
    async fn test_default_then_upsert() {
        let pool = test_support::pool().await;
        let store = test_support::store(&pool, "TK01").await;
        let grid = get_or_default(&pool, store.id).await.unwrap();
        assert_eq!((grid.columns, grid.rows), (2, 2));
        assert!(find(&pool, store.id).await.unwrap().is_none());

        let saved = upsert(
            &pool,
            store.id,
            &PhotoGridUpdate {
                columns: 3,
                rows: 2,
                captions: vec!["Depan".into(), "Kasir".into()],
            },
        )
        .await
        .unwrap();
        assert_eq!(saved.slot_count(), 6);
        assert_eq!(saved.caption(1), "Kasir");

        let replaced = upsert(
            &pool,
            store.id,
            &PhotoGridUpdate {
                columns: 1,
                rows: 1,
                captions: vec![],
            },
        )
        .await
        .unwrap();
        assert_eq!(replaced.slot_count(), 1);
        assert!(replaced.captions.is_empty());
    }

    #[tokio::test]
    async fn test_size_checked_by_schema() {
        let pool = test_support::pool().await;
        let store = test_support::store(&pool, "TK01").await;
        let err = upsert(
            &pool,
            store.id,
            &PhotoGridUpdate {
                columns: 7,
                rows: 1,
                captions: vec![],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }
}
