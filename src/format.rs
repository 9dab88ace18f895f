//! Date formatting for display.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::DateParseError;

/// Placeholder shown for dates that cannot be parsed.
pub const UNKNOWN_DATE: &str = "Unknown";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%B %Y",
];

/// Formats a date string as `"Month YYYY"`, or `"Unknown"` if it cannot be parsed.
///
/// # Example
///
/// ```rust
/// use themepref::format_date;
///
/// assert_eq!(format_date("2024-03-15T09:30:00Z"), "March 2024");
/// assert_eq!(format_date("not-a-date"), "Unknown");
/// ```
pub fn format_date(input: &str) -> String {
    match parse_date(input) {
        Ok(date) => date.format("%B %Y").to_string(),
        Err(_) => UNKNOWN_DATE.to_string(),
    }
}

/// Parses the calendar date out of a date or timestamp string.
///
/// Accepts RFC 3339 and RFC 2822 timestamps, ISO date-times without an
/// offset, ISO dates, `YYYY/MM/DD`, US `MM/DD/YYYY`, English month-name forms
/// (`March 5, 2024`, `Mar 5 2024`, `5 March 2024`, `March 2024`),
/// `YYYY-MM` and a bare `YYYY`. Timestamps carrying an offset yield the date
/// in that offset.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateParseError> {
    let s = input.trim();
    let fail = || DateParseError {
        input: input.to_string(),
    };
    if s.is_empty() {
        return Err(fail());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Ok(dt.date_naive());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Ok(dt.date());
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| parse_naive_date(s, fmt))
    {
        return Ok(date);
    }

    parse_partial(s).ok_or_else(fail)
}

fn parse_naive_date(s: &str, fmt: &str) -> Option<NaiveDate> {
    // chrono needs a day; month-only forms pin the first.
    if fmt.contains("%d") {
        NaiveDate::parse_from_str(s, fmt).ok()
    } else {
        NaiveDate::parse_from_str(&format!("1 {s}"), &format!("%d {fmt}")).ok()
    }
}

/// `YYYY-MM` and `YYYY`.
fn parse_partial(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    let all_digits = |part: &[u8]| !part.is_empty() && part.iter().all(u8::is_ascii_digit);

    match bytes.len() {
        4 if all_digits(bytes) => NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1),
        7 if bytes[4] == b'-' && all_digits(&bytes[..4]) && all_digits(&bytes[5..]) => {
            let year = s[..4].parse().ok()?;
            let month = s[5..].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, 1)
        }
        _ => None,
    }
}
