//! Shift Note Repository

use super::{RepoError, RepoResult};
use shared::models::{ShiftNote, ShiftNoteCreate, ShiftNoteUpdate};
use sqlx::SqlitePool;

const NOTE_SELECT: &str = "SELECT id, store_id, date, shift, author_id, author_name, content, created_at, updated_at \
     FROM shift_notes";

/// Notes of a store, newest first. `date` narrows to a single day.
pub async fn find_by_store(
    pool: &SqlitePool,
    store_id: i64,
    date: Option<&str>,
    shift: Option<i64>,
) -> RepoResult<Vec<ShiftNote>> {
    let sql = format!(
        "{NOTE_SELECT} WHERE store_id = ?1 AND (?2 IS NULL OR date = ?2) AND (?3 IS NULL OR shift = ?3) \
         ORDER BY date DESC, shift DESC, created_at DESC"
    );
    let rows = sqlx::query_as::<_, ShiftNote>(&sql)
        .bind(store_id)
        .bind(date)
        .bind(shift)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, store_id: i64, id: i64) -> RepoResult<Option<ShiftNote>> {
    let sql = format!("{NOTE_SELECT} WHERE id = ?1 AND store_id = ?2");
    let row = sqlx::query_as::<_, ShiftNote>(&sql)
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    store_id: i64,
    data: &ShiftNoteCreate,
    author_id: Option<i64>,
    author_name: &str,
) -> RepoResult<ShiftNote> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO shift_notes (store_id, date, shift, author_id, author_name, content, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) RETURNING id",
    )
    .bind(store_id)
    .bind(&data.date)
    .bind(data.shift)
    .bind(author_id)
    .bind(author_name)
    .bind(data.content.trim())
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, store_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create shift note".into()))
}

pub async fn update(pool: &SqlitePool, store_id: i64, id: i64, data: &ShiftNoteUpdate) -> RepoResult<ShiftNote> {
    let rows = sqlx::query(
        "UPDATE shift_notes SET shift = COALESCE(?1, shift), content = COALESCE(?2, content), updated_at = ?3 \
         WHERE id = ?4 AND store_id = ?5",
    )
    .bind(data.shift)
    .bind(data.content.as_deref().map(str::trim))
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(store_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Shift note {id} not found")));
    }
    find_by_id(pool, store_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Shift note {id} not found")))
}

pub async fn delete(pool: &SqlitePool, store_id: i64, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM shift_notes WHERE id = ?1 AND store_id = ?2")
        .bind(id)
        .bind(store_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
