//! Shared utilities for CLI commands.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use ts_core::Candidate;

/// Parse a `--date` value as a calendar date.
///
/// Supports:
/// - Plain date: "2026-02-15"
/// - Local datetime: "2026-02-15T10:00:00"
/// - RFC 3339: "2026-02-15T10:00:00Z" (the date as written, offset ignored)
pub fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    Err(format!(
        "invalid date: {s}. Use YYYY-MM-DD (e.g., 2026-02-15) or ISO 8601 (e.g., 2026-02-15T10:00:00)"
    ))
}

/// One-line label for a candidate in human-readable output.
pub fn candidate_label(candidate: &Candidate) -> String {
    match candidate.external_id() {
        Some(external_id) => format!("{} [{external_id}]", candidate.name),
        None => candidate.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_arg_accepts_plain_date() {
        assert_eq!(
            parse_date_arg("2026-02-15"),
            Ok(NaiveDate::from_ymd_opt(2026, 2, 15).unwrap())
        );
    }

    #[test]
    fn parse_date_arg_accepts_datetimes() {
        let expected = NaiveDate::from_ymd_opt(2026, 2, 15).unwrap();
        assert_eq!(parse_date_arg("2026-02-15T10:00:00"), Ok(expected));
        assert_eq!(parse_date_arg("2026-02-15T23:30:00+07:00"), Ok(expected));
    }

    #[test]
    fn parse_date_arg_rejects_garbage() {
        let err = parse_date_arg("next tuesday").unwrap_err();
        assert!(err.contains("invalid date"));
    }

    #[test]
    fn candidate_label_includes_external_id() {
        let candidate = Candidate::new("4", "GSC Matter").unwrap();
        assert_eq!(candidate_label(&candidate), "GSC Matter");
        let candidate = candidate.with_external_id("2000");
        assert_eq!(candidate_label(&candidate), "GSC Matter [2000]");
    }
}
