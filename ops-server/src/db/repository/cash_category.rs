//! Cash Category Repository

use super::{RepoError, RepoResult};
use shared::models::{CashCategory, CashCategoryCreate, CashCategoryUpdate, CashKind};
use sqlx::SqlitePool;

const CATEGORY_SELECT: &str =
    "SELECT id, name, kind, is_active, created_at, updated_at FROM cash_categories";

pub async fn find_all(
    pool: &SqlitePool,
    kind: Option<CashKind>,
    include_inactive: bool,
) -> RepoResult<Vec<CashCategory>> {
    let sql = format!(
        "{CATEGORY_SELECT} WHERE (?1 IS NULL OR kind = ?1) AND (?2 OR is_active = 1) ORDER BY kind, name"
    );
    let rows = sqlx::query_as::<_, CashCategory>(&sql)
        .bind(kind)
        .bind(include_inactive)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<CashCategory>> {
    let sql = format!("{CATEGORY_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, CashCategory>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: &CashCategoryCreate) -> RepoResult<CashCategory> {
    let now = shared::util::now_millis();
    let name = data.name.trim();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO cash_categories (name, kind, is_active, created_at, updated_at) \
         VALUES (?1, ?2, 1, ?3, ?3) RETURNING id",
    )
    .bind(name)
    .bind(data.kind)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        RepoError::from(e).on_duplicate(format!(
            "{} category {name} already exists",
            data.kind.label()
        ))
    })?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create cash category".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &CashCategoryUpdate) -> RepoResult<CashCategory> {
    let name = data.name.as_deref().map(str::trim);
    let rows = sqlx::query(
        "UPDATE cash_categories SET name = COALESCE(?1, name), is_active = COALESCE(?2, is_active), \
         updated_at = ?3 WHERE id = ?4",
    )
    .bind(name)
    .bind(data.is_active)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| {
        RepoError::from(e).on_duplicate(format!(
            "Category {} already exists",
            name.unwrap_or_default()
        ))
    })?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Cash category {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Cash category {id} not found")))
}

/// Delete an unused category; categories referenced by transactions must be deactivated instead
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let used: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cash_transactions WHERE category_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if used > 0 {
        return Err(RepoError::Validation(
            "Category is used by cash transactions; deactivate it instead".into(),
        ));
    }
    let rows = sqlx::query("DELETE FROM cash_categories WHERE id = ?")
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
    async fn test_category_crud() {
        let pool = test_support::pool().await;
        let setoran = create(
            &pool,
            &CashCategoryCreate {
                name: "Setoran".into(),
                kind: CashKind::Income,
            },
        )
        .await
        .unwrap();
        // Same name under the other kind is a different category
        create(
            &pool,
            &CashCategoryCreate {
                name: "Setoran".into(),
                kind: CashKind::Expense,
            },
        )
        .await
        .unwrap();
        let err = create(
            &pool,
            &CashCategoryCreate {
                name: "Setoran".into(),
                kind: CashKind::Income,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        let income = find_all(&pool, Some(CashKind::Income), false).await.unwrap();
        assert_eq!(income.len(), 1);

        update(
            &pool,
            setoran.id,
            &CashCategoryUpdate {
                name: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap();
        assert!(find_all(&pool, Some(CashKind::Income), false).await.unwrap().is_empty());
        assert!(delete(&pool, setoran.id).await.unwrap());
    }
}
