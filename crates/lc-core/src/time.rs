//! UTC calendar-date helpers.
//!
//! Scheduling is date-granular: "today" is the current UTC instant truncated
//! to midnight, and due dates are written as bare `YYYY-MM-DD`.

use chrono::{Days, NaiveDate, Utc};

/// Wire format for due dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Current UTC calendar date.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Format a date as ISO-8601 `YYYY-MM-DD` (no time, no offset).
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `date + days`, saturating at the end of chrono's calendar.
pub fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_is_date_only() {
        assert_eq!(format_date(ymd(2026, 2, 1)), "2026-02-01");
    }

    #[test]
    fn test_add_days_crosses_month_and_year() {
        assert_eq!(add_days(ymd(2026, 1, 31), 1), ymd(2026, 2, 1));
        assert_eq!(add_days(ymd(2025, 12, 20), 14), ymd(2026, 1, 3));
    }

    #[test]
    fn test_add_days_leap_year() {
        assert_eq!(add_days(ymd(2028, 2, 28), 1), ymd(2028, 2, 29));
    }

    #[test]
    fn test_add_days_saturates() {
        assert_eq!(add_days(NaiveDate::MAX, 30), NaiveDate::MAX);
    }

    #[test]
    fn test_today_is_recent() {
        let today = format_date(today_utc());
        assert!(today.starts_with("20"), "date should be in 2000s: {today}");
    }
}
