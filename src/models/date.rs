use chrono::{DateTime, Datelike, NaiveDate};

use crate::error::PearlError;

/// Parse a calendar date. Accepts `YYYY-MM-DD` or an RFC 3339 timestamp,
/// whose date part is kept.
pub fn parse_date(input: &str) -> Result<NaiveDate, PearlError> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.date_naive());
    }
    Err(PearlError::validation(format!(
        "Invalid date '{input}': expected YYYY-MM-DD"
    )))
}

/// Like [`parse_date`], but blank input means no date.
pub fn parse_optional_date(input: Option<&str>) -> Result<Option<NaiveDate>, PearlError> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date(s).map(Some),
    }
}

/// Parse `YYYY-MM` (or a full date) into the first day of that month.
pub fn parse_month(input: &str) -> Result<NaiveDate, PearlError> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d") {
        return Ok(date);
    }
    parse_date(trimmed)
        .ok()
        .and_then(|d| d.with_day(1))
        .ok_or_else(|| PearlError::validation(format!("Invalid month '{input}': expected YYYY-MM")))
}
