//! Shift Checklist Repository
//!
//! Items are positioned in submission order. Replacing the item list
//! clears every done flag.

use std::collections::HashMap;

use super::{RepoError, RepoResult};
use shared::models::{
    ChecklistItem, ShiftChecklist, ShiftChecklistCreate, ShiftChecklistUpdate, ShiftChecklistView,
};
use sqlx::{SqliteConnection, SqlitePool};

const CHECKLIST_SELECT: &str =
    "SELECT id, store_id, date, shift, title, created_by, created_at, updated_at FROM shift_checklists";

const ITEM_SELECT: &str =
    "SELECT id, checklist_id, label, position, is_done, done_at, done_by FROM checklist_items";

async fn insert_items(conn: &mut SqliteConnection, checklist_id: i64, items: &[String]) -> RepoResult<()> {
    for (position, label) in items.iter().enumerate() {
        sqlx::query(
            "INSERT INTO checklist_items (checklist_id, label, position, is_done) VALUES (?1, ?2, ?3, 0)",
        )
        .bind(checklist_id)
        .bind(label.trim())
        .bind(position as i64)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn find_by_store(
    pool: &SqlitePool,
    store_id: i64,
    date: Option<&str>,
    shift: Option<i64>,
) -> RepoResult<Vec<ShiftChecklistView>> {
    let sql = format!(
        "{CHECKLIST_SELECT} WHERE store_id = ?1 AND (?2 IS NULL OR date = ?2) AND (?3 IS NULL OR shift = ?3) \
         ORDER BY date DESC, shift, id"
    );
    let checklists = sqlx::query_as::<_, ShiftChecklist>(&sql)
        .bind(store_id)
        .bind(date)
        .bind(shift)
        .fetch_all(pool)
        .await?;

    let items = sqlx::query_as::<_, ChecklistItem>(
        "SELECT i.id, i.checklist_id, i.label, i.position, i.is_done, i.done_at, i.done_by \
         FROM checklist_items i JOIN shift_checklists c ON c.id = i.checklist_id \
         WHERE c.store_id = ?1 AND (?2 IS NULL OR c.date = ?2) AND (?3 IS NULL OR c.shift = ?3)",
    )
    .bind(store_id)
    .bind(date)
    .bind(shift)
    .fetch_all(pool)
    .await?;

    let mut by_checklist: HashMap<i64, Vec<ChecklistItem>> = HashMap::new();
    for item in items {
        by_checklist.entry(item.checklist_id).or_default().push(item);
    }

    Ok(checklists
        .into_iter()
        .map(|checklist| {
            let items = by_checklist.remove(&checklist.id).unwrap_or_default();
            ShiftChecklistView::new(checklist, items)
        })
        .collect())
}

pub async fn find_by_id(pool: &SqlitePool, store_id: i64, id: i64) -> RepoResult<Option<ShiftChecklistView>> {
    let sql = format!("{CHECKLIST_SELECT} WHERE id = ?1 AND store_id = ?2");
    let Some(checklist) = sqlx::query_as::<_, ShiftChecklist>(&sql)
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let sql = format!("{ITEM_SELECT} WHERE checklist_id = ? ORDER BY position");
    let items = sqlx::query_as::<_, ChecklistItem>(&sql)
        .bind(checklist.id)
        .fetch_all(pool)
        .await?;
    Ok(Some(ShiftChecklistView::new(checklist, items)))
}

pub async fn create(
    pool: &SqlitePool,
    store_id: i64,
    data: &ShiftChecklistCreate,
    created_by: Option<i64>,
) -> RepoResult<ShiftChecklistView> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO shift_checklists (store_id, date, shift, title, created_by, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) RETURNING id",
    )
    .bind(store_id)
    .bind(&data.date)
    .bind(data.shift)
    .bind(data.title.trim())
    .bind(created_by)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;
    insert_items(&mut tx, id, &data.items).await?;
    tx.commit().await?;

    find_by_id(pool, store_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create checklist".into()))
}

pub async fn update(
    pool: &SqlitePool,
    store_id: i64,
    id: i64,
    data: &ShiftChecklistUpdate,
) -> RepoResult<ShiftChecklistView> {
    let mut tx = pool.begin().await?;
    let rows = sqlx::query(
        "UPDATE shift_checklists SET title = COALESCE(?1, title), updated_at = ?2 WHERE id = ?3 AND store_id = ?4",
    )
    .bind(data.title.as_deref().map(str::trim))
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(store_id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Checklist {id} not found")));
    }

    if let Some(items) = &data.items {
        sqlx::query("DELETE FROM checklist_items WHERE checklist_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_items(&mut tx, id, items).await?;
    }
    tx.commit().await?;

    find_by_id(pool, store_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Checklist {id} not found")))
}

/// Mark an item done or not done; `done_at`/`done_by` are cleared when unticked
pub async fn toggle_item(
    pool: &SqlitePool,
    store_id: i64,
    checklist_id: i64,
    item_id: i64,
    is_done: bool,
    user_id: Option<i64>,
) -> RepoResult<ShiftChecklistView> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    let rows = sqlx::query(
        "UPDATE checklist_items SET is_done = ?1, \
         done_at = CASE WHEN ?1 THEN ?2 ELSE NULL END, done_by = CASE WHEN ?1 THEN ?3 ELSE NULL END \
         WHERE id = ?4 AND checklist_id = ?5 \
         AND EXISTS (SELECT 1 FROM shift_checklists c WHERE c.id = ?5 AND c.store_id = ?6)",
    )
    .bind(is_done)
    .bind(now)
    .bind(user_id)
    .bind(item_id)
    .bind(checklist_id)
    .bind(store_id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Checklist item {item_id} not found")));
    }
    sqlx::query("UPDATE shift_checklists SET updated_at = ?1 WHERE id = ?2")
        .bind(now)
        .bind(checklist_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    find_by_id(pool, store_id, checklist_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Checklist {checklist_id} not found")))
}

pub async fn delete(pool: &SqlitePool, store_id: i64, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM shift_checklists WHERE id = ?1 AND store_id = ?2")
        .bind(id)
        .bind(store_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
