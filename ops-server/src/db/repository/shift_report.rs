//! Shift Report Repository
//!
//! A report is a monthly header plus at most one detail row per date.
//! Detail rows are always written together with their header.

use std::collections::HashMap;

use super::{RepoError, RepoResult};
use shared::metrics::{DailyFigures, SalesTotals};
use shared::models::{
    ShiftReport, ShiftReportCreate, ShiftReportDetail, ShiftReportDetailInput, ShiftReportSummary,
    ShiftReportUpdate, ShiftReportView,
};
use sqlx::{SqliteConnection, SqlitePool};

const REPORT_SELECT: &str =
    "SELECT id, store_id, shift, month, note, created_by, created_at, updated_at FROM shift_reports";

const DETAIL_SELECT: &str = "SELECT id, report_id, date, spd, std, pulsa FROM shift_report_details";

async fn insert_details(
    conn: &mut SqliteConnection,
    report_id: i64,
    details: &[ShiftReportDetailInput],
) -> RepoResult<()> {
    for detail in details {
        sqlx::query(
            "INSERT INTO shift_report_details (report_id, date, spd, std, pulsa) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(report_id)
        .bind(&detail.date)
        .bind(detail.spd)
        .bind(detail.std)
        .bind(detail.pulsa)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            RepoError::from(e).on_duplicate(format!("Report already has a row for {}", detail.date))
        })?;
    }
    Ok(())
}

/// Reports of a store with their totals, newest month first
pub async fn find_by_store(
    pool: &SqlitePool,
    store_id: i64,
    month: Option<&str>,
    shift: Option<i64>,
) -> RepoResult<Vec<ShiftReportSummary>> {
    let sql = format!(
        "{REPORT_SELECT} WHERE store_id = ?1 AND (?2 IS NULL OR month = ?2) AND (?3 IS NULL OR shift = ?3) \
         ORDER BY month DESC, shift, id"
    );
    let reports = sqlx::query_as::<_, ShiftReport>(&sql)
        .bind(store_id)
        .bind(month)
        .bind(shift)
        .fetch_all(pool)
        .await?;

    let details = sqlx::query_as::<_, ShiftReportDetail>(
        "SELECT d.id, d.report_id, d.date, d.spd, d.std, d.pulsa FROM shift_report_details d \
         JOIN shift_reports r ON r.id = d.report_id \
         WHERE r.store_id = ?1 AND (?2 IS NULL OR r.month = ?2) AND (?3 IS NULL OR r.shift = ?3)",
    )
    .bind(store_id)
    .bind(month)
    .bind(shift)
    .fetch_all(pool)
    .await?;

    let mut by_report: HashMap<i64, Vec<DailyFigures>> = HashMap::new();
    for detail in &details {
        by_report.entry(detail.report_id).or_default().push(detail.figures());
    }

    Ok(reports
        .into_iter()
        .map(|report| {
            let totals = SalesTotals::from_days(by_report.remove(&report.id).unwrap_or_default());
            ShiftReportSummary { report, totals }
        })
        .collect())
}

pub async fn find_by_id(pool: &SqlitePool, store_id: i64, id: i64) -> RepoResult<Option<ShiftReport>> {
    let sql = format!("{REPORT_SELECT} WHERE id = ?1 AND store_id = ?2");
    let report = sqlx::query_as::<_, ShiftReport>(&sql)
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await?;
    Ok(report)
}

pub async fn find_details(pool: &SqlitePool, report_id: i64) -> RepoResult<Vec<ShiftReportDetail>> {
    let sql = format!("{DETAIL_SELECT} WHERE report_id = ? ORDER BY date");
    let details = sqlx::query_as::<_, ShiftReportDetail>(&sql)
        .bind(report_id)
        .fetch_all(pool)
        .await?;
    Ok(details)
}

/// Header with ordered rows and totals
pub async fn find_view(pool: &SqlitePool, store_id: i64, id: i64) -> RepoResult<Option<ShiftReportView>> {
    let Some(report) = find_by_id(pool, store_id, id).await? else {
        return Ok(None);
    };
    let details = find_details(pool, report.id).await?;
    Ok(Some(ShiftReportView::new(report, details)))
}

pub async fn create(
    pool: &SqlitePool,
    store_id: i64,
    data: &ShiftReportCreate,
    created_by: Option<i64>,
) -> RepoResult<ShiftReportView> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO shift_reports (store_id, shift, month, note, created_by, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) RETURNING id",
    )
    .bind(store_id)
    .bind(data.shift)
    .bind(&data.month)
    .bind(&data.note)
    .bind(created_by)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    insert_details(&mut tx, id, &data.details).await?;
    tx.commit().await?;

    find_view(pool, store_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create shift report".into()))
}

/// Update the header; `details`, when present, replaces every row
pub async fn update(
    pool: &SqlitePool,
    store_id: i64,
    id: i64,
    data: &ShiftReportUpdate,
) -> RepoResult<ShiftReportView> {
    let mut tx = pool.begin().await?;
    let rows = sqlx::query(
        "UPDATE shift_reports SET shift = COALESCE(?1, shift), note = COALESCE(?2, note), updated_at = ?3 \
         WHERE id = ?4 AND store_id = ?5",
    )
    .bind(data.shift)
    .bind(&data.note)
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(store_id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Shift report {id} not found")));
    }

    if let Some(details) = &data.details {
        sqlx::query("DELETE FROM shift_report_details WHERE report_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_details(&mut tx, id, details).await?;
    }
    tx.commit().await?;

    find_view(pool, store_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Shift report {id} not found")))
}

pub async fn delete(pool: &SqlitePool, store_id: i64, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM shift_reports WHERE id = ?1 AND store_id = ?2")
        .bind(id)
        .bind(store_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Actual sales for a month. Rows for the same date across reports are
/// summed first, so each calendar day counts once toward the APC mean.
pub async fn actual_totals(
    pool: &SqlitePool,
    store_id: i64,
    month: &str,
    shift: Option<i64>,
) -> RepoResult<SalesTotals> {
    let days: Vec<(i64, i64, i64)> = sqlx::query_as(
        "SELECT COALESCE(SUM(d.spd), 0), COALESCE(SUM(d.std), 0), COALESCE(SUM(d.pulsa), 0) \
         FROM shift_report_details d JOIN shift_reports r ON r.id = d.report_id \
         WHERE r.store_id = ?1 AND r.month = ?2 AND (?3 IS NULL OR r.shift = ?3) \
         GROUP BY d.date ORDER BY d.date",
    )
    .bind(store_id)
    .bind(month)
    .bind(shift)
    .fetch_all(pool)
    .await?;

    Ok(SalesTotals::from_days(
        days.into_iter()
            .map(|(spd, std, pulsa)| DailyFigures::new(spd, std, pulsa)),
    ))
}
