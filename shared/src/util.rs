/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Format an integer rupiah amount with dot thousands separators.
///
/// `1_200_000` → `"Rp 1.200.000"`, `-50_000` → `"-Rp 50.000"`.
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

/// Format a plain count with dot thousands separators (no currency prefix)
pub fn format_thousands(value: i64) -> String {
    let formatted = format_rupiah(value);
    formatted.replacen("Rp ", "", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rupiah() {
        assert_eq!(format_rupiah(0), "Rp 0");
        assert_eq!(format_rupiah(999), "Rp 999");
        assert_eq!(format_rupiah(1_000), "Rp 1.000");
        assert_eq!(format_rupiah(1_200_000), "Rp 1.200.000");
        assert_eq!(format_rupiah(-50_000), "-Rp 50.000");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(45), "45");
        assert_eq!(format_thousands(12_345), "12.345");
        assert_eq!(format_thousands(-1_500), "-1.500");
    }
}
