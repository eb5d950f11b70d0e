use chrono::{DateTime, NaiveDate};

/// Parse a record date string.
/// Accepts `YYYY-MM-DD`, an RFC 3339 timestamp, or any string starting with `YYYY-MM-DD`.
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    if let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(day);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.date_naive());
    }
    date.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Format a date string to a more readable format
pub fn format_date(date: &str) -> String {
    match parse_date(date) {
        Some(day) => day.format("%b %d, %Y").to_string(),
        None => date.to_string(),
    }
}
