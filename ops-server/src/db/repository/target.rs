//! KPI Target Repository

use super::{RepoError, RepoResult};
use shared::models::{Target, TargetCreate, TargetUpdate};
use sqlx::SqlitePool;

const TARGET_SELECT: &str = "SELECT id, store_id, month, shift, target_spd, target_std, target_apc, target_pulsa, \
     created_at, updated_at FROM targets";

pub async fn find_by_store(pool: &SqlitePool, store_id: i64, month: Option<&str>) -> RepoResult<Vec<Target>> {
    let sql = format!("{TARGET_SELECT} WHERE store_id = ?1 AND (?2 IS NULL OR month = ?2) ORDER BY month DESC, shift");
    let rows = sqlx::query_as::<_, Target>(&sql)
        .bind(store_id)
        .bind(month)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Targets for one month, either every shift or just `shift`
pub async fn find_for_month(
    pool: &SqlitePool,
    store_id: i64,
    month: &str,
    shift: Option<i64>,
) -> RepoResult<Vec<Target>> {
    let sql = format!(
        "{TARGET_SELECT} WHERE store_id = ?1 AND month = ?2 AND (?3 IS NULL OR shift = ?3) ORDER BY shift"
    );
    let rows = sqlx::query_as::<_, Target>(&sql)
        .bind(store_id)
        .bind(month)
        .bind(shift)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, store_id: i64, id: i64) -> RepoResult<Option<Target>> {
    let sql = format!("{TARGET_SELECT} WHERE id = ?1 AND store_id = ?2");
    let row = sqlx::query_as::<_, Target>(&sql)
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, store_id: i64, data: &TargetCreate) -> RepoResult<Target> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO targets (store_id, month, shift, target_spd, target_std, target_apc, target_pulsa, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8) RETURNING id",
    )
    .bind(store_id)
    .bind(&data.month)
    .bind(data.shift)
    .bind(data.target_spd)
    .bind(data.target_std)
    .bind(data.target_apc)
    .bind(data.target_pulsa)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        RepoError::from(e).on_duplicate(format!(
            "Target for {} shift {} already exists",
            data.month, data.shift
        ))
    })?;
    find_by_id(pool, store_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create target".into()))
}

pub async fn update(pool: &SqlitePool, store_id: i64, id: i64, data: &TargetUpdate) -> RepoResult<Target> {
    let rows = sqlx::query(
        "UPDATE targets SET target_spd = COALESCE(?1, target_spd), target_std = COALESCE(?2, target_std), \
         target_apc = COALESCE(?3, target_apc), target_pulsa = COALESCE(?4, target_pulsa), updated_at = ?5 \
         WHERE id = ?6 AND store_id = ?7",
    )
    .bind(data.target_spd)
    .bind(data.target_std)
    .bind(data.target_apc)
    .bind(data.target_pulsa)
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(store_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Target {id} not found")));
    }
    find_by_id(pool, store_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Target {id} not found")))
}

pub async fn delete(pool: &SqlitePool, store_id: i64, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM targets WHERE id = ?1 AND store_id = ?2")
        .bind(id)
        .bind(store_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support;

    fn payload(month: &str, shift: i64) -> TargetCreate {
        TargetCreate {
            month: month.into(),
            shift,
            target_spd: 30_000_000,
            target_std: 1_200,
            target_apc: 25_000,
            target_pulsa: 0,
        }
    }

    #[tokio::test]
    async fn test_one_target_per_month_and_shift() {
        let pool = test_support::pool().await;
        let store = test_support::store(&pool, "TK01").await;
        create(&pool, store.id, &payload("2024-05", 1)).await.unwrap();
        create(&pool, store.id, &payload("2024-05", 2)).await.unwrap();
        let err = create(&pool, store.id, &payload("2024-05", 1)).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(msg) if msg == "Target for 2024-05 shift 1 already exists"));

        assert_eq!(find_for_month(&pool, store.id, "2024-05", None).await.unwrap().len(), 2);
        assert_eq!(find_for_month(&pool, store.id, "2024-05", Some(2)).await.unwrap().len(), 1);
        assert!(find_for_month(&pool, store.id, "2024-06", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_update() {
        let pool = test_support::pool().await;
        let store = test_support::store(&pool, "TK01").await;
        let target = create(&pool, store.id, &payload("2024-05", 1)).await.unwrap();
        let updated = update(
            &pool,
            store.id,
            target.id,
            &TargetUpdate {
                target_spd: Some(35_000_000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.target_spd, 35_000_000);
        assert_eq!(updated.target_apc, 25_000);

        let other = test_support::store(&pool, "TK02").await;
        let err = update(&pool, other.id, target.id, &TargetUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
