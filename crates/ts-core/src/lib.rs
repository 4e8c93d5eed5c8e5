//! Core parsing logic for the timesheet assistant.
//!
//! Turns a free-form time entry such as
//! `"Worked on GSC Matter - draft email 1h 30m on 16 Feb"` into billing data:
//! - Duration: minutes spent, from hour and minute quantities
//! - Date: an optional calendar date named in the text
//! - Matter: candidates from the caller's list that the text refers to
//! - Units: six-minute billing increments, rounded up
//! - Description: the text with a leading "Worked on <matter>" removed
//!
//! Every function here is pure and synchronous. Nothing-found outcomes are
//! reported as `0`, `None` or an empty [`MatchResult`], never as errors.

mod candidate;
pub mod date;
pub mod description;
pub mod duration;
pub mod entry;
pub mod fuzzy;
pub mod matter;
mod types;
pub mod units;

pub use candidate::Candidate;
pub use date::{extract_date, extract_date_in_year};
pub use description::clean_description;
pub use duration::extract_duration;
pub use entry::{EntryOptions, ParsedEntry, parse_entry};
pub use matter::{MatchResult, MatchStage, MatterMatch, match_matter, match_matter_default};
pub use types::{MatterId, Threshold, ValidationError};
pub use units::{MINUTES_PER_UNIT, calculate_units};
