//! Date extraction from free-form entry text.
//!
//! Three pattern families are tried in priority order:
//! 1. Named month: "16 Feb", "16 February 2026"
//! 2. Numeric with year: "16/02/2026", "16-02-2026"
//! 3. Numeric without year: "16/02", only after a context word
//!
//! The first family that matches decides the outcome. An impossible date such
//! as "31 Feb" yields `None` instead of falling through to a later family.

use std::sync::LazyLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;

/// Month names and abbreviations, longest spelling first within each month.
const MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("jan", 1),
    ("february", 2),
    ("feb", 2),
    ("march", 3),
    ("mar", 3),
    ("april", 4),
    ("apr", 4),
    ("may", 5),
    ("june", 6),
    ("jun", 6),
    ("july", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sept", 9),
    ("sep", 9),
    ("october", 10),
    ("oct", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dec", 12),
];

/// Words that must precede a year-less numeric date.
const CONTEXT_WORDS: &[&str] = &["on", "date", "dated", "at"];

static NAMED_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    let names = MONTHS
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(\d{{1,2}})\s+({names})\b(?:\s+(\d{{4}})\b)?")).unwrap()
});

static NUMERIC_WITH_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{4})\b").unwrap());

static NUMERIC_NO_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})[/-](\d{1,2})\b").unwrap());

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// Extract a calendar date, defaulting a missing year to the current year.
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    extract_date_in_year(text, Local::now().year())
}

/// Extract a calendar date, defaulting a missing year to `default_year`.
pub fn extract_date_in_year(text: &str, default_year: i32) -> Option<NaiveDate> {
    if let Some(caps) = NAMED_MONTH_RE.captures(text) {
        let month = month_number(&caps[2])?;
        let year = caps
            .get(3)
            .map_or(Some(default_year), |y| y.as_str().parse().ok())?;
        return build_date(year, month, &caps[1]);
    }

    if let Some(caps) = NUMERIC_WITH_YEAR_RE.captures(text) {
        let year = caps[3].parse().ok()?;
        let month = caps[2].parse().ok()?;
        return build_date(year, month, &caps[1]);
    }

    if let Some(caps) = NUMERIC_NO_YEAR_RE.captures(text) {
        let start = caps.get(0).map_or(0, |m| m.start());
        if !has_context_word(&text[..start]) {
            tracing::debug!(
                candidate = &caps[0],
                "ignoring numeric date without a preceding context word"
            );
            return None;
        }
        let month = caps[2].parse().ok()?;
        return build_date(default_year, month, &caps[1]);
    }

    None
}

fn month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    MONTHS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, number)| *number)
}

fn has_context_word(prefix: &str) -> bool {
    let prefix = prefix.to_lowercase();
    WORD_RE
        .find_iter(&prefix)
        .any(|word| CONTEXT_WORDS.contains(&word.as_str()))
}

fn build_date(year: i32, month: u32, day: &str) -> Option<NaiveDate> {
    let day = day.parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day);
    if date.is_none() {
        tracing::debug!(year, month, day, "rejected impossible date");
    }
    date
}
