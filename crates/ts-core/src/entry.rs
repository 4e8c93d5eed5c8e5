//! Full parse of one time entry.
//!
//! Runs every extractor over the same text and bundles the results. What to
//! do with an empty or ambiguous match set is left to the caller.

use chrono::NaiveDate;

use crate::candidate::Candidate;
use crate::date::extract_date;
use crate::description::clean_description;
use crate::duration::extract_duration;
use crate::matter::{MatchResult, match_matter};
use crate::types::Threshold;
use crate::units::calculate_units;

/// Caller-supplied knobs for [`parse_entry`].
#[derive(Debug, Clone, Default)]
pub struct EntryOptions {
    /// Fuzzy similarity threshold for matter resolution.
    pub threshold: Threshold,
    /// Used when the text itself contains no date. A date in the text wins.
    pub fallback_date: Option<NaiveDate>,
}

/// Structured billing data extracted from one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry<'a> {
    /// Duration in minutes; `0` when none was found.
    pub minutes: u32,
    /// Six-minute billing units derived from `minutes`.
    pub units: i64,
    pub date: Option<NaiveDate>,
    pub matches: MatchResult<'a>,
    /// Entry text with a leading "Worked on <top matter>" removed.
    pub description: String,
}

impl ParsedEntry<'_> {
    /// Whether a duration was found.
    pub const fn has_duration(&self) -> bool {
        self.minutes > 0
    }
}

/// Parse an entry against the caller's current candidate snapshot.
pub fn parse_entry<'a>(
    text: &str,
    candidates: &'a [Candidate],
    options: &EntryOptions,
) -> ParsedEntry<'a> {
    let minutes = extract_duration(text);
    let date = extract_date(text).or(options.fallback_date);
    let matches = match_matter(text, candidates, options.threshold);
    let description = matches.top().map_or_else(
        || text.to_string(),
        |top| clean_description(text, &top.name),
    );

    tracing::debug!(
        minutes,
        ?date,
        matches = matches.len(),
        stage = ?matches.stage(),
        "parsed entry"
    );

    ParsedEntry {
        minutes,
        units: calculate_units(i64::from(minutes)),
        date,
        matches,
        description,
    }
}
