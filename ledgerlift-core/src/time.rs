//! Date helpers for the canonical `YYYY-MM-DD` transaction date.

use chrono::NaiveDate;

/// True when `date` is a real calendar date written as zero-padded `YYYY-MM-DD`.
///
/// Only canonical dates sort chronologically as strings.
pub fn is_canonical_date(date: &str) -> bool {
    date.len() == 10 && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

/// `YYYY-MM-DD` -> `MM/DD`. Anything without exactly three `-` segments is
/// returned unchanged.
pub fn display_date(date: &str) -> String {
    let parts: Vec<&str> = date.split('-').collect();
    if parts.len() == 3 {
        format!("{}/{}", parts[1], parts[2])
    } else {
        date.to_string()
    }
}
