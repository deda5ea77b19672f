//! Date, month and clock-time parsing
//!
//! Dates travel as `YYYY-MM-DD`, months as `YYYY-MM` and clock times as `HH:MM`.
//! Handlers parse them here so the repository layer only sees well-formed text,
//! which also keeps lexicographic ordering in SQL equal to date ordering.

use chrono::{Datelike, NaiveDate, NaiveTime};

use shared::ErrorCode;

use super::{AppError, AppResult};

const DATE_FORMAT: &str = "%Y-%m-%d";
const CLOCK_FORMAT: &str = "%H:%M";

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(field: &str, date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
        .map_err(|_| AppError::field(field, format!("invalid date '{date}', expected YYYY-MM-DD")))
}

/// Parse and normalize a date back to its canonical text
pub fn normalize_date(field: &str, date: &str) -> AppResult<String> {
    Ok(parse_date(field, date)?.format(DATE_FORMAT).to_string())
}

/// Parse a `YYYY-MM` month into its first day
pub fn parse_month(field: &str, month: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", month.trim()), DATE_FORMAT).map_err(|_| {
        AppError::with_message(ErrorCode::InvalidMonth, format!("{field}: invalid month '{month}'"))
            .with_field_error(field, "expected YYYY-MM")
    })
}

/// Parse and normalize a month back to `YYYY-MM`
pub fn normalize_month(field: &str, month: &str) -> AppResult<String> {
    Ok(parse_month(field, month)?.format("%Y-%m").to_string())
}

/// Parse an `HH:MM` clock time
pub fn parse_clock(field: &str, clock: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(clock.trim(), CLOCK_FORMAT).map_err(|_| {
        AppError::with_message(ErrorCode::InvalidClockTime, format!("{field}: invalid time '{clock}'"))
            .with_field_error(field, "expected HH:MM")
    })
}

/// First and last calendar day of the month that starts at `first`
pub fn month_bounds(first: NaiveDate) -> (NaiveDate, NaiveDate) {
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next.and_then(|d| d.pred_opt()).unwrap_or(first);
    (first, last)
}

/// Inclusive `YYYY-MM-DD` range for a `YYYY-MM` month
pub fn month_date_range(month: &str) -> AppResult<(String, String)> {
    let (first, last) = month_bounds(parse_month("month", month)?);
    Ok((
        first.format(DATE_FORMAT).to_string(),
        last.format(DATE_FORMAT).to_string(),
    ))
}

/// Whether `date` falls inside the month beginning at `first`
pub fn date_in_month(date: NaiveDate, first: NaiveDate) -> bool {
    date.year() == first.year() && date.month() == first.month()
}

/// Today's date as `YYYY-MM-DD` (server local time)
pub fn today() -> String {
    chrono::Local::now().date_naive().format(DATE_FORMAT).to_string()
}

/// Current month as `YYYY-MM` (server local time)
pub fn current_month() -> String {
    chrono::Local::now().date_naive().format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert!(parse_date("date", "2024-05-01").is_ok());
        assert!(parse_date("date", "2024-02-30").is_err());
        let err = parse_date("date", "01/05/2024").unwrap_err();
        assert!(err.field_error("date").is_some());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(normalize_month("month", "2024-05").unwrap(), "2024-05");
        let err = parse_month("month", "2024-13").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidMonth);
    }

    #[test]
    fn test_month_range() {
        assert_eq!(
            month_date_range("2024-02").unwrap(),
            ("2024-02-01".to_string(), "2024-02-29".to_string())
        );
        assert_eq!(
            month_date_range("2023-12").unwrap(),
            ("2023-12-01".to_string(), "2023-12-31".to_string())
        );
    }

    #[test]
    fn test_date_in_month() {
        let may = parse_month("month", "2024-05").unwrap();
        assert!(date_in_month(parse_date("d", "2024-05-31").unwrap(), may));
        assert!(!date_in_month(parse_date("d", "2024-06-01").unwrap(), may));
    }

    #[test]
    fn test_parse_clock() {
        assert!(parse_clock("clock_in", "07:30").is_ok());
        let err = parse_clock("clock_in", "25:00").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidClockTime);
    }
}
