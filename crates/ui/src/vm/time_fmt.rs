use chrono::{DateTime, Utc};

#[must_use]
pub fn format_date(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// Countdown label, e.g. `5s`.
#[must_use]
pub fn format_seconds(remaining: u32) -> String {
    format!("{remaining}s")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn formats_calendar_date_only() {
        assert_eq!(format_date(fixed_now()), "2023-11-14");
        assert_eq!(format_seconds(3), "3s");
    }
}
