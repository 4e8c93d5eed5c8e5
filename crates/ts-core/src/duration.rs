//! Duration extraction from free-form entry text.
//!
//! Recognizes an hour quantity ("1h", "1.5 hr", "2 hours") and a minute
//! quantity ("30m", "45 mins", "1 minute"). When both appear, as in
//! "1h 30m", they are added together.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Integer or decimal followed by an hour unit. Longest unit first.
static HOURS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*(?:hours|hour|hrs|hr|h)").unwrap()
});

/// Integer followed by a minute unit. Longest unit first.
static MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\s*(?:minutes|minute|mins|min|m)").unwrap());

/// Extract a duration in minutes.
///
/// Returns `0` when the text holds neither an hour nor a minute quantity.
/// Only the first occurrence of each kind counts.
pub fn extract_duration(text: &str) -> u32 {
    let hours = first_unit_match(&HOURS_RE, text).map_or(0, |caps| hours_to_minutes(&caps[1]));
    let minutes = first_unit_match(&MINUTES_RE, text).map_or(0, |caps| {
        // Only digits reach here, so a parse failure means overflow.
        caps[1].parse::<u32>().unwrap_or(u32::MAX)
    });

    let total = hours.saturating_add(minutes);
    tracing::trace!(hours, minutes, total, "extracted duration");
    total
}

/// First match whose unit word is not glued to further Latin letters.
///
/// Keeps "1404 MOU" from reading as 1404 minutes and "2 months" as 2 minutes.
/// Thai and other scripts often follow a unit with no space ("2hกับทีม"), so
/// only ASCII letters count as glued.
fn first_unit_match<'t>(re: &Regex, text: &'t str) -> Option<Captures<'t>> {
    re.captures_iter(text).find(|caps| {
        let end = caps.get(0).map_or(0, |m| m.end());
        !text[end..].chars().next().is_some_and(|c| c.is_ascii_alphabetic())
    })
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "hours are non-negative and the float cast saturates"
)]
fn hours_to_minutes(raw: &str) -> u32 {
    let hours: f64 = raw.parse().unwrap_or(0.0);
    (hours * 60.0) as u32
}
