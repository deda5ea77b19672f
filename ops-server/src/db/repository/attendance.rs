//! Attendance Repository

use super::{RepoError, RepoResult};
use shared::models::{Attendance, AttendanceCreate, AttendanceSummary, AttendanceUpdate};
use sqlx::SqlitePool;

const ATTENDANCE_SELECT: &str = "SELECT a.id, a.store_id, a.employee_id, e.name AS employee_name, a.date, a.shift, \
     a.clock_in, a.clock_out, a.status, a.note, a.created_at, a.updated_at \
     FROM attendances a JOIN employees e ON e.id = a.employee_id";

/// List filters; dates are inclusive `YYYY-MM-DD`
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub employee_id: Option<i64>,
}

pub async fn find_by_store(
    pool: &SqlitePool,
    store_id: i64,
    filter: &AttendanceFilter,
) -> RepoResult<Vec<Attendance>> {
    let sql = format!(
        "{ATTENDANCE_SELECT} WHERE a.store_id = ?1 AND (?2 IS NULL OR a.date >= ?2) \
         AND (?3 IS NULL OR a.date <= ?3) AND (?4 IS NULL OR a.employee_id = ?4) \
         ORDER BY a.date DESC, e.name"
    );
    let rows = sqlx::query_as::<_, Attendance>(&sql)
        .bind(store_id)
        .bind(&filter.date_from)
        .bind(&filter.date_to)
        .bind(filter.employee_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, store_id: i64, id: i64) -> RepoResult<Option<Attendance>> {
    let sql = format!("{ATTENDANCE_SELECT} WHERE a.id = ?1 AND a.store_id = ?2");
    let row = sqlx::query_as::<_, Attendance>(&sql)
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Record attendance. A second record for the same employee and date is a duplicate.
pub async fn create(pool: &SqlitePool, store_id: i64, data: &AttendanceCreate) -> RepoResult<Attendance> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO attendances (store_id, employee_id, date, shift, clock_in, clock_out, status, note, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9) RETURNING id",
    )
    .bind(store_id)
    .bind(data.employee_id)
    .bind(&data.date)
    .bind(data.shift)
    .bind(&data.clock_in)
    .bind(&data.clock_out)
    .bind(data.status)
    .bind(&data.note)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        RepoError::from(e).on_duplicate(format!(
            "Attendance for this employee on {} already exists",
            data.date
        ))
    })?;
    find_by_id(pool, store_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create attendance".into()))
}

pub async fn update(
    pool: &SqlitePool,
    store_id: i64,
    id: i64,
    data: &AttendanceUpdate,
) -> RepoResult<Attendance> {
    let rows = sqlx::query(
        "UPDATE attendances SET shift = COALESCE(?1, shift), clock_in = COALESCE(?2, clock_in), \
         clock_out = COALESCE(?3, clock_out), status = COALESCE(?4, status), note = COALESCE(?5, note), \
         updated_at = ?6 WHERE id = ?7 AND store_id = ?8",
    )
    .bind(data.shift)
    .bind(&data.clock_in)
    .bind(&data.clock_out)
    .bind(data.status)
    .bind(&data.note)
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(store_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Attendance {id} not found")));
    }
    find_by_id(pool, store_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Attendance {id} not found")))
}

pub async fn delete(pool: &SqlitePool, store_id: i64, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM attendances WHERE id = ?1 AND store_id = ?2")
        .bind(id)
        .bind(store_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Status counts per employee between two dates (inclusive).
/// Active employees appear even without records; inactive ones only when they have some.
pub async fn summary(
    pool: &SqlitePool,
    store_id: i64,
    date_from: &str,
    date_to: &str,
) -> RepoResult<Vec<AttendanceSummary>> {
    let rows = sqlx::query_as::<_, AttendanceSummary>(
        "SELECT e.id AS employee_id, e.name AS employee_name, \
         COALESCE(SUM(CASE WHEN a.status = 'present' THEN 1 ELSE 0 END), 0) AS present, \
         COALESCE(SUM(CASE WHEN a.status = 'absent' THEN 1 ELSE 0 END), 0) AS absent, \
         COALESCE(SUM(CASE WHEN a.status = 'late' THEN 1 ELSE 0 END), 0) AS late, \
         COALESCE(SUM(CASE WHEN a.status = 'sick' THEN 1 ELSE 0 END), 0) AS sick, \
         COALESCE(SUM(CASE WHEN a.status = 'leave' THEN 1 ELSE 0 END), 0) AS leave, \
         COALESCE(SUM(CASE WHEN a.status = 'off' THEN 1 ELSE 0 END), 0) AS off \
         FROM employees e \
         LEFT JOIN attendances a ON a.employee_id = e.id AND a.date >= ?2 AND a.date <= ?3 \
         WHERE e.store_id = ?1 \
         GROUP BY e.id, e.name, e.is_active \
         HAVING e.is_active = 1 OR COUNT(a.id) > 0 \
         ORDER BY e.name",
    )
    .bind(store_id)
    .bind(date_from)
    .bind(date_to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{employee, test_support};
    use shared::models::{AttendanceStatus, Employee, EmployeeCreate};

    async fn setup() -> (SqlitePool, i64, Employee) {
        let pool = test_support::pool().await;
        let store = test_support::store(&pool, "TK01").await;
        let (emp, _) = employee::create(
            &pool,
            store.id,
            &EmployeeCreate {
                nik: "3201010101900123".into(),
                name: "Sari".into(),
                position: None,
                phone: None,
            },
            "hash",
        )
        .await
        .unwrap();
        (pool, store.id, emp)
    }

    fn record(employee_id: i64, date: &str, status: AttendanceStatus) -> AttendanceCreate {
        AttendanceCreate {
            employee_id,
            date: date.into(),
            shift: 1,
            clock_in: Some("07:00".into()),
            clock_out: Some("15:00".into()),
            status,
            note: None,
        }
    }

    #[tokio::test]
    async fn test_one_record_per_employee_per_day() {
        let (pool, store_id, emp) = setup().await;
        let first = create(&pool, store_id, &record(emp.id, "2024-05-01", AttendanceStatus::Present))
            .await
            .unwrap();
        assert_eq!(first.employee_name, "Sari");

        let err = create(&pool, store_id, &record(emp.id, "2024-05-01", AttendanceStatus::Late))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(msg) if msg.contains("2024-05-01")));

        create(&pool, store_id, &record(emp.id, "2024-05-02", AttendanceStatus::Late))
            .await
            .unwrap();
        let all = find_by_store(&pool, store_id, &AttendanceFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_filters_and_update() {
        let (pool, store_id, emp) = setup().await;
        let row = create(&pool, store_id, &record(emp.id, "2024-05-01", AttendanceStatus::Present))
            .await
            .unwrap();
        create(&pool, store_id, &record(emp.id, "2024-06-01", AttendanceStatus::Off))
            .await
            .unwrap();

        let may = AttendanceFilter {
            date_from: Some("2024-05-01".into()),
            date_to: Some("2024-05-31".into()),
            employee_id: Some(emp.id),
        };
        assert_eq!(find_by_store(&pool, store_id, &may).await.unwrap().len(), 1);

        let updated = update(
            &pool,
            store_id,
            row.id,
            &AttendanceUpdate {
                status: Some(AttendanceStatus::Sick),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.status, AttendanceStatus::Sick);
        assert_eq!(updated.clock_in.as_deref(), Some("07:00"));
    }

    #[tokio::test]
    async fn test_monthly_summary() {
        let (pool, store_id, emp) = setup().await;
        for (date, status) in [
            ("2024-05-01", AttendanceStatus::Present),
            ("2024-05-02", AttendanceStatus::Present),
            ("2024-05-03", AttendanceStatus::Late),
            ("2024-05-04", AttendanceStatus::Off),
            ("2024-06-01", AttendanceStatus::Absent),
        ] {
            create(&pool, store_id, &record(emp.id, date, status)).await.unwrap();
        }
        let rows = summary(&pool, store_id, "2024-05-01", "2024-05-31").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].present, 2);
        assert_eq!(rows[0].late, 1);
        assert_eq!(rows[0].off, 1);
        assert_eq!(rows[0].absent, 0);
        assert_eq!(rows[0].total(), 4);
    }

    #[tokio::test]
    async fn test_summary_lists_active_employee_without_records() {
        let (pool, store_id, _) = setup().await;
        let rows = summary(&pool, store_id, "2024-05-01", "2024-05-31").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total(), 0);
    }
}
