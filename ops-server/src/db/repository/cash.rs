//! Cash Transaction Repository
//!
//! Transactions start `pending`. Only approved rows feed the balance rollup,
//! so approval and any change to an approved row recompute balances inside
//! the same database transaction.

use chrono::NaiveDate;
use uuid::Uuid;

use super::{RepoError, RepoResult, balance};
use shared::models::{
    ApprovalStatus, CashKind, CashTransaction, CashTransactionCreate, CashTransactionUpdate,
};
use sqlx::SqlitePool;

const TRANSACTION_SELECT: &str = "SELECT t.id, t.store_id, t.category_id, c.name AS category_name, t.kind, t.amount, \
     t.transaction_date, t.description, t.reference_no, t.status, t.created_by, t.approved_by, \
     t.approved_at, t.created_at, t.updated_at \
     FROM cash_transactions t JOIN cash_categories c ON c.id = t.category_id";

/// Attempts at drawing an unused reference number
const MAX_REFERENCE_ATTEMPTS: usize = 5;

/// `CT-YYYYMMDD-XXXXXXXX`: issue date plus 8 random uppercase hex digits
pub fn generate_reference_no(issued_on: NaiveDate) -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
    format!("CT-{}-{}", issued_on.format("%Y%m%d"), suffix)
}

/// List filters; dates are inclusive `YYYY-MM-DD`
#[derive(Debug, Clone, Default)]
pub struct CashFilter {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub status: Option<ApprovalStatus>,
    pub kind: Option<CashKind>,
}

pub async fn find_by_store(
    pool: &SqlitePool,
    store_id: i64,
    filter: &CashFilter,
) -> RepoResult<Vec<CashTransaction>> {
    let sql = format!(
        "{TRANSACTION_SELECT} WHERE t.store_id = ?1 AND (?2 IS NULL OR t.transaction_date >= ?2) \
         AND (?3 IS NULL OR t.transaction_date <= ?3) AND (?4 IS NULL OR t.status = ?4) \
         AND (?5 IS NULL OR t.kind = ?5) \
         ORDER BY t.transaction_date DESC, t.id DESC"
    );
    let rows = sqlx::query_as::<_, CashTransaction>(&sql)
        .bind(store_id)
        .bind(&filter.date_from)
        .bind(&filter.date_to)
        .bind(filter.status)
        .bind(filter.kind)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, store_id: i64, id: i64) -> RepoResult<Option<CashTransaction>> {
    let sql = format!("{TRANSACTION_SELECT} WHERE t.id = ?1 AND t.store_id = ?2");
    let row = sqlx::query_as::<_, CashTransaction>(&sql)
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_reference(pool: &SqlitePool, reference_no: &str) -> RepoResult<Option<CashTransaction>> {
    let sql = format!("{TRANSACTION_SELECT} WHERE t.reference_no = ?");
    let row = sqlx::query_as::<_, CashTransaction>(&sql)
        .bind(reference_no)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert a pending transaction with a fresh reference number
pub async fn create(
    pool: &SqlitePool,
    store_id: i64,
    data: &CashTransactionCreate,
    created_by: Option<i64>,
) -> RepoResult<CashTransaction> {
    let now = shared::util::now_millis();
    let today = chrono::Local::now().date_naive();

    for attempt in 1..=MAX_REFERENCE_ATTEMPTS {
        let reference_no = generate_reference_no(today);
        let inserted: Result<i64, sqlx::Error> = sqlx::query_scalar(
            "INSERT INTO cash_transactions (store_id, category_id, kind, amount, transaction_date, description, \
             reference_no, status, created_by, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'pending', ?8, ?9, ?9) RETURNING id",
        )
        .bind(store_id)
        .bind(data.category_id)
        .bind(data.kind)
        .bind(data.amount)
        .bind(&data.transaction_date)
        .bind(&data.description)
        .bind(&reference_no)
        .bind(created_by)
        .bind(now)
        .fetch_one(pool)
        .await;

        match inserted.map_err(RepoError::from) {
            Ok(id) => {
                return find_by_id(pool, store_id, id)
                    .await?
                    .ok_or_else(|| RepoError::Database("Failed to create cash transaction".into()));
            }
            Err(RepoError::Duplicate(_)) => {
                tracing::warn!(attempt, reference_no = %reference_no, "Reference number collision, retrying");
            }
            Err(e) => return Err(e),
        }
    }

    Err(RepoError::Duplicate(
        "Could not allocate a unique reference number".into(),
    ))
}

/// Edit amount, category, date or description.
/// Rejected rows are final. When the row is approved, balances are recomputed
/// from the earlier of the old and new dates.
pub async fn update(
    pool: &SqlitePool,
    store_id: i64,
    id: i64,
    data: &CashTransactionUpdate,
) -> RepoResult<CashTransaction> {
    let existing = find_by_id(pool, store_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Cash transaction {id} not found")))?;
    if existing.status == ApprovalStatus::Rejected {
        return Err(RepoError::Conflict("Transaction is rejected".into()));
    }

    let mut tx = pool.begin().await?;
    sqlx::query(
        "UPDATE cash_transactions SET category_id = COALESCE(?1, category_id), amount = COALESCE(?2, amount), \
         transaction_date = COALESCE(?3, transaction_date), description = COALESCE(?4, description), \
         updated_at = ?5 WHERE id = ?6 AND store_id = ?7",
    )
    .bind(data.category_id)
    .bind(data.amount)
    .bind(&data.transaction_date)
    .bind(&data.description)
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(store_id)
    .execute(&mut *tx)
    .await?;

    if existing.status == ApprovalStatus::Approved {
        let new_date = data
            .transaction_date
            .as_deref()
            .unwrap_or(&existing.transaction_date);
        let from = existing.transaction_date.as_str().min(new_date);
        balance::recompute_from(&mut tx, store_id, from).await?;
    }
    tx.commit().await?;

    find_by_id(pool, store_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Cash transaction {id} not found")))
}

pub async fn delete(pool: &SqlitePool, store_id: i64, id: i64) -> RepoResult<bool> {
    let Some(existing) = find_by_id(pool, store_id, id).await? else {
        return Ok(false);
    };

    let mut tx = pool.begin().await?;
    let rows = sqlx::query("DELETE FROM cash_transactions WHERE id = ?1 AND store_id = ?2")
        .bind(id)
        .bind(store_id)
        .execute(&mut *tx)
        .await?;
    if existing.status == ApprovalStatus::Approved {
        balance::recompute_from(&mut tx, store_id, &existing.transaction_date).await?;
    }
    tx.commit().await?;
    Ok(rows.rows_affected() > 0)
}

/// Approve or reject a pending transaction.
/// Anything other than `pending` is a [`RepoError::Conflict`].
pub async fn set_status(
    pool: &SqlitePool,
    store_id: i64,
    id: i64,
    status: ApprovalStatus,
    decided_by: Option<i64>,
) -> RepoResult<CashTransaction> {
    if status == ApprovalStatus::Pending {
        return Err(RepoError::Validation("Status must be approved or rejected".into()));
    }

    let mut tx = pool.begin().await?;
    let current: Option<(ApprovalStatus, String)> = sqlx::query_as(
        "SELECT status, transaction_date FROM cash_transactions WHERE id = ?1 AND store_id = ?2",
    )
    .bind(id)
    .bind(store_id)
    .fetch_optional(&mut *tx)
    .await?;
    let (current, date) =
        current.ok_or_else(|| RepoError::NotFound(format!("Cash transaction {id} not found")))?;
    if current != ApprovalStatus::Pending {
        return Err(RepoError::Conflict(format!(
            "Transaction is already {}",
            current.as_str()
        )));
    }

    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE cash_transactions SET status = ?1, approved_by = ?2, approved_at = ?3, updated_at = ?3 \
         WHERE id = ?4 AND store_id = ?5 AND status = 'pending'",
    )
    .bind(status)
    .bind(decided_by)
    .bind(now)
    .bind(id)
    .bind(store_id)
    .execute(&mut *tx)
    .await?;

    if status == ApprovalStatus::Approved {
        balance::recompute_from(&mut tx, store_id, &date).await?;
    }
    tx.commit().await?;

    find_by_id(pool, store_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Cash transaction {id} not found")))
}
