//! Cash Balance Repository
//!
//! Daily rollup per store:
//!
//! - opening = closing of the latest earlier balance row, 0 when none
//! - closing = opening + approved income - approved expense of that date
//!
//! A change on one date shifts every later closing balance, so recomputation
//! always walks forward from the changed date to the last known date.

use super::RepoResult;
use shared::models::{CashBalance, CashMonthSummary};
use sqlx::{SqliteConnection, SqlitePool};

const BALANCE_SELECT: &str = "SELECT id, store_id, date, opening_balance, total_income, total_expense, closing_balance, updated_at FROM cash_balances";

/// Recompute balance rows for `from_date` and every later date of the store.
///
/// Runs on the caller's connection so it can join the transaction that
/// changed the underlying cash rows.
pub async fn recompute_from(conn: &mut SqliteConnection, store_id: i64, from_date: &str) -> RepoResult<()> {
    let now = shared::util::now_millis();

    let mut opening: i64 = sqlx::query_scalar(
        "SELECT closing_balance FROM cash_balances WHERE store_id = ?1 AND date < ?2 \
         ORDER BY date DESC LIMIT 1",
    )
    .bind(store_id)
    .bind(from_date)
    .fetch_optional(&mut *conn)
    .await?
    .unwrap_or(0);

    // Dates that already have a row or now have approved activity
    let dates: Vec<String> = sqlx::query_scalar(
        "SELECT date FROM cash_balances WHERE store_id = ?1 AND date >= ?2 \
         UNION \
         SELECT transaction_date FROM cash_transactions \
         WHERE store_id = ?1 AND transaction_date >= ?2 AND status = 'approved' \
         ORDER BY 1",
    )
    .bind(store_id)
    .bind(from_date)
    .fetch_all(&mut *conn)
    .await?;

    for date in &dates {
        let (income, expense): (i64, i64) = sqlx::query_as(
            "SELECT \
             COALESCE(SUM(CASE WHEN kind = 'income' THEN amount ELSE 0 END), 0), \
             COALESCE(SUM(CASE WHEN kind = 'expense' THEN amount ELSE 0 END), 0) \
             FROM cash_transactions \
             WHERE store_id = ?1 AND transaction_date = ?2 AND status = 'approved'",
        )
        .bind(store_id)
        .bind(date)
        .fetch_one(&mut *conn)
        .await?;

        let closing = CashBalance::expected_closing(opening, income, expense);
        sqlx::query(
            "INSERT INTO cash_balances (store_id, date, opening_balance, total_income, total_expense, closing_balance, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
             ON CONFLICT (store_id, date) DO UPDATE SET \
             opening_balance = excluded.opening_balance, total_income = excluded.total_income, \
             total_expense = excluded.total_expense, closing_balance = excluded.closing_balance, \
             updated_at = excluded.updated_at",
        )
        .bind(store_id)
        .bind(date)
        .bind(opening)
        .bind(income)
        .bind(expense)
        .bind(closing)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        opening = closing;
    }

    tracing::debug!(store_id, from_date, days = dates.len(), "Cash balances recomputed");
    Ok(())
}

/// Recompute from `from_date` in a transaction of its own
pub async fn recompute(pool: &SqlitePool, store_id: i64, from_date: &str) -> RepoResult<()> {
    let mut tx = pool.begin().await?;
    recompute_from(&mut tx, store_id, from_date).await?;
    tx.commit().await?;
    Ok(())
}

/// Rebuild every balance row of the store from its first date
pub async fn recompute_all(pool: &SqlitePool, store_id: i64) -> RepoResult<()> {
    recompute(pool, store_id, "").await
}

/// Balance rows between two dates (inclusive), oldest first
pub async fn find_range(
    pool: &SqlitePool,
    store_id: i64,
    date_from: &str,
    date_to: &str,
) -> RepoResult<Vec<CashBalance>> {
    let sql = format!("{BALANCE_SELECT} WHERE store_id = ?1 AND date >= ?2 AND date <= ?3 ORDER BY date");
    let rows = sqlx::query_as::<_, CashBalance>(&sql)
        .bind(store_id)
        .bind(date_from)
        .bind(date_to)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_date(pool: &SqlitePool, store_id: i64, date: &str) -> RepoResult<Option<CashBalance>> {
    let sql = format!("{BALANCE_SELECT} WHERE store_id = ?1 AND date = ?2");
    let row = sqlx::query_as::<_, CashBalance>(&sql)
        .bind(store_id)
        .bind(date)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Approved totals and pending count between two dates
///
/// `closing_balance` is the latest balance row on or before `date_to`, so a
/// quiet month still reports the balance carried in from earlier months.
pub async fn month_summary(
    pool: &SqlitePool,
    store_id: i64,
    date_from: &str,
    date_to: &str,
) -> RepoResult<CashMonthSummary> {
    let (total_income, total_expense, pending_count): (i64, i64, i64) = sqlx::query_as(
        "SELECT \
         COALESCE(SUM(CASE WHEN kind = 'income' AND status = 'approved' THEN amount ELSE 0 END), 0), \
         COALESCE(SUM(CASE WHEN kind = 'expense' AND status = 'approved' THEN amount ELSE 0 END), 0), \
         COALESCE(SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END), 0) \
         FROM cash_transactions \
         WHERE store_id = ?1 AND transaction_date >= ?2 AND transaction_date <= ?3",
    )
    .bind(store_id)
    .bind(date_from)
    .bind(date_to)
    .fetch_one(pool)
    .await?;

    let closing_balance: Option<i64> = sqlx::query_scalar(
        "SELECT closing_balance FROM cash_balances \
         WHERE store_id = ?1 AND date <= ?2 ORDER BY date DESC LIMIT 1",
    )
    .bind(store_id)
    .bind(date_to)
    .fetch_optional(pool)
    .await?;

    Ok(CashMonthSummary {
        total_income,
        total_expense,
        net: total_income.saturating_sub(total_expense),
        pending_count,
        closing_balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{cash, cash_category, test_support};
    use shared::models::{
        ApprovalStatus, CashCategoryCreate, CashKind, CashTransaction, CashTransactionCreate,
    };

    struct Fixture {
        pool: SqlitePool,
        store_id: i64,
        income_cat: i64,
        expense_cat: i64,
    }

    async fn fixture() -> Fixture {
        let pool = test_support::pool().await;
        let store = test_support::store(&pool, "TK01").await;
        let income_cat = cash_category::create(
            &pool,
            &CashCategoryCreate {
                name: "Setoran".into(),
                kind: CashKind::Income,
            },
        )
        .await
        .unwrap()
        .id;
        let expense_cat = cash_category::create(
            &pool,
            &CashCategoryCreate {
                name: "Listrik".into(),
                kind: CashKind::Expense,
            },
        )
        .await
        .unwrap()
        .id;
        Fixture {
            pool,
            store_id: store.id,
            income_cat,
            expense_cat,
        }
    }

    impl Fixture {
        async fn approved(&self, kind: CashKind, amount: i64, date: &str) -> CashTransaction {
            let category_id = match kind {
                CashKind::Income => self.income_cat,
                CashKind::Expense => self.expense_cat,
            };
            let tx = cash::create(
                &self.pool,
                self.store_id,
                &CashTransactionCreate {
                    category_id,
                    kind,
                    amount,
                    transaction_date: date.into(),
                    description: None,
                },
                None,
            )
            .await
            .unwrap();
            cash::set_status(&self.pool, self.store_id, tx.id, ApprovalStatus::Approved, None)
                .await
                .unwrap()
        }

        async fn balance(&self, date: &str) -> CashBalance {
            find_by_date(&self.pool, self.store_id, date).await.unwrap().unwrap()
        }
    }

    #[tokio::test]
    async fn test_closing_equals_opening_plus_income_minus_expense() {
        let f = fixture().await;
        f.approved(CashKind::Income, 100_000, "2024-05-01").await;
        f.approved(CashKind::Income, 50_000, "2024-05-02").await;
        f.approved(CashKind::Expense, 30_000, "2024-05-02").await;

        let day1 = f.balance("2024-05-01").await;
        assert_eq!(day1.opening_balance, 0);
        assert_eq!(day1.closing_balance, 100_000);

        let day2 = f.balance("2024-05-02").await;
        assert_eq!(day2.opening_balance, 100_000);
        assert_eq!(day2.total_income, 50_000);
        assert_eq!(day2.total_expense, 30_000);
        assert_eq!(day2.closing_balance, 120_000);
        assert!(day2.is_consistent());
    }

    #[tokio::test]
    async fn test_pending_and_rejected_do_not_count() {
        let f = fixture().await;
        f.approved(CashKind::Income, 100_000, "2024-05-01").await;
        let pending = cash::create(
            &f.pool,
            f.store_id,
            &CashTransactionCreate {
                category_id: f.expense_cat,
                kind: CashKind::Expense,
                amount: 40_000,
                transaction_date: "2024-05-01".into(),
                description: None,
            },
            None,
        )
        .await
        .unwrap();
        assert_eq!(f.balance("2024-05-01").await.closing_balance, 100_000);

        cash::set_status(&f.pool, f.store_id, pending.id, ApprovalStatus::Rejected, None)
            .await
            .unwrap();
        assert_eq!(f.balance("2024-05-01").await.closing_balance, 100_000);
    }

    #[tokio::test]
    async fn test_backdated_change_cascades_forward() {
        let f = fixture().await;
        f.approved(CashKind::Income, 100_000, "2024-05-01").await;
        f.approved(CashKind::Income, 50_000, "2024-05-03").await;
        assert_eq!(f.balance("2024-05-03").await.closing_balance, 150_000);

        // Expense approved for an earlier day moves every later balance
        f.approved(CashKind::Expense, 20_000, "2024-05-02").await;
        let day2 = f.balance("2024-05-02").await;
        assert_eq!(day2.opening_balance, 100_000);
        assert_eq!(day2.closing_balance, 80_000);
        let day3 = f.balance("2024-05-03").await;
        assert_eq!(day3.opening_balance, 80_000);
        assert_eq!(day3.closing_balance, 130_000);
    }

    #[tokio::test]
    async fn test_deleting_approved_transaction_rolls_back_balance() {
        let f = fixture().await;
        f.approved(CashKind::Income, 100_000, "2024-05-01").await;
        let expense = f.approved(CashKind::Expense, 25_000, "2024-05-01").await;
        f.approved(CashKind::Income, 10_000, "2024-05-02").await;
        assert_eq!(f.balance("2024-05-02").await.closing_balance, 85_000);

        assert!(cash::delete(&f.pool, f.store_id, expense.id).await.unwrap());
        assert_eq!(f.balance("2024-05-01").await.closing_balance, 100_000);
        assert_eq!(f.balance("2024-05-02").await.closing_balance, 110_000);
    }

    #[tokio::test]
    async fn test_recompute_is_idempotent() {
        let f = fixture().await;
        f.approved(CashKind::Income, 100_000, "2024-05-01").await;
        f.approved(CashKind::Expense, 30_000, "2024-05-02").await;
        let before = find_range(&f.pool, f.store_id, "2024-05-01", "2024-05-31").await.unwrap();

        recompute_all(&f.pool, f.store_id).await.unwrap();
        recompute_all(&f.pool, f.store_id).await.unwrap();
        let after = find_range(&f.pool, f.store_id, "2024-05-01", "2024-05-31").await.unwrap();

        let closings = |rows: &[CashBalance]| rows.iter().map(|b| b.closing_balance).collect::<Vec<_>>();
        assert_eq!(closings(&before), closings(&after));
        assert_eq!(closings(&after), vec![100_000, 70_000]);
    }

    #[tokio::test]
    async fn test_month_summary() {
        let f = fixture().await;
        f.approved(CashKind::Income, 100_000, "2024-05-01").await;
        f.approved(CashKind::Expense, 30_000, "2024-05-02").await;
        cash::create(
            &f.pool,
            f.store_id,
            &CashTransactionCreate {
                category_id: f.income_cat,
                kind: CashKind::Income,
                amount: 5_000,
                transaction_date: "2024-05-03".into(),
                description: None,
            },
            None,
        )
        .await
        .unwrap();

        let summary = month_summary(&f.pool, f.store_id, "2024-05-01", "2024-05-31").await.unwrap();
        assert_eq!(summary.total_income, 100_000);
        assert_eq!(summary.total_expense, 30_000);
        assert_eq!(summary.net, 70_000);
        assert_eq!(summary.pending_count, 1);
        assert_eq!(summary.closing_balance, Some(70_000));
    }

    #[tokio::test]
    async fn test_month_summary_carries_earlier_balance() {
        let f = fixture().await;
        f.approved(CashKind::Income, 100_000, "2024-04-30").await;

        let may = month_summary(&f.pool, f.store_id, "2024-05-01", "2024-05-31").await.unwrap();
        assert_eq!(may.total_income, 0);
        assert_eq!(may.net, 0);
        assert_eq!(may.closing_balance, Some(100_000));

        let march = month_summary(&f.pool, f.store_id, "2024-03-01", "2024-03-31").await.unwrap();
        assert_eq!(march.closing_balance, None);
    }
}
