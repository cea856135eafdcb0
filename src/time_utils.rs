// SPDX-License-Identifier: MIT

//! Shared helpers for date/time formatting.

use chrono::DateTime;

/// Format a provider activity timestamp as a `YYYY-MM-DD` report date.
///
/// Providers send RFC3339 start times (`2024-03-15T07:30:00Z`). Anything
/// unparseable is passed through untouched so a report is still produced.
pub fn format_report_date(start: &str) -> String {
    match DateTime::parse_from_rfc3339(start) {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => start.to_string(),
    }
}

/// Format a duration in seconds as `M:SS`, rounding to the nearest second.
///
/// Minutes are not capped, so an hour renders as `60:00`.
pub fn format_min_sec(seconds: f64) -> String {
    let total = seconds.round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
