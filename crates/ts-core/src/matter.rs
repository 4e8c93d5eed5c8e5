//! Matter resolution: pick candidates referenced by an entry's text.
//!
//! Resolution runs a fixed chain of stages, strongest evidence first:
//!
//! 1. [`MatchStage::ExternalId`] - an external ID appears as a whole token
//! 2. [`MatchStage::ExactName`] - a matter name appears verbatim
//! 3. [`MatchStage::WordSet`] - every word of a matter name appears
//! 4. [`MatchStage::Fuzzy`] - similarity score at or above the threshold
//!
//! The first stage that finds anything wins and later stages never run.
//! Nothing is merged across stages, and the resolver only ever returns
//! references into the caller's candidate slice.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::candidate::Candidate;
use crate::fuzzy;
use crate::types::Threshold;

/// Short ASCII words must match a whole word, not a substring.
const SHORT_TOKEN_MAX_LEN: usize = 3;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// The stage that produced a [`MatchResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStage {
    ExternalId,
    ExactName,
    WordSet,
    Fuzzy,
}

impl MatchStage {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ExternalId => "external_id",
            Self::ExactName => "exact_name",
            Self::WordSet => "word_set",
            Self::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for MatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One matched candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatterMatch<'a> {
    pub candidate: &'a Candidate,
    /// Similarity score, only set by the fuzzy stage.
    pub score: Option<u8>,
}

impl<'a> MatterMatch<'a> {
    const fn exact(candidate: &'a Candidate) -> Self {
        Self {
            candidate,
            score: None,
        }
    }
}

/// Ordered matches for one resolution call.
///
/// Callers decide policy from [`len`](Self::len): zero means nothing matched,
/// one is an unambiguous match, more than one needs disambiguation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchResult<'a> {
    matches: Vec<MatterMatch<'a>>,
    stage: Option<MatchStage>,
}

impl<'a> MatchResult<'a> {
    /// The stage that produced the matches, `None` when nothing matched.
    pub const fn stage(&self) -> Option<MatchStage> {
        self.stage
    }

    pub fn matches(&self) -> &[MatterMatch<'a>] {
        &self.matches
    }

    /// Matched candidates in result order.
    pub fn candidates(&self) -> impl Iterator<Item = &'a Candidate> + '_ {
        self.matches.iter().map(|m| m.candidate)
    }

    /// The highest-priority candidate, if any.
    pub fn top(&self) -> Option<&'a Candidate> {
        self.matches.first().map(|m| m.candidate)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Text prepared once and shared by every stage.
struct Query<'t> {
    text: &'t str,
    lower: String,
    words: HashSet<String>,
    threshold: Threshold,
}

impl<'t> Query<'t> {
    fn new(text: &'t str, threshold: Threshold) -> Self {
        let lower = text.to_lowercase();
        let words = WORD_RE
            .find_iter(&lower)
            .map(|m| m.as_str().to_string())
            .collect();
        Self {
            text,
            lower,
            words,
            threshold,
        }
    }
}

/// A stage yields `Some` only with at least one match.
type Stage = for<'a> fn(&Query<'_>, &'a [Candidate]) -> Option<Vec<MatterMatch<'a>>>;

const STAGES: [(MatchStage, Stage); 4] = [
    (MatchStage::ExternalId, match_external_id),
    (MatchStage::ExactName, match_exact_name),
    (MatchStage::WordSet, match_word_set),
    (MatchStage::Fuzzy, match_fuzzy),
];

/// Resolve the matters an entry refers to.
///
/// Never fails: an empty candidate list, or text that matches nothing,
/// produces an empty result.
pub fn match_matter<'a>(
    text: &str,
    candidates: &'a [Candidate],
    threshold: Threshold,
) -> MatchResult<'a> {
    if candidates.is_empty() {
        tracing::debug!("no candidates to match against");
        return MatchResult::default();
    }

    let query = Query::new(text, threshold);
    let found = STAGES.iter().find_map(|(stage, run)| {
        let matches = run(&query, candidates)?;
        tracing::debug!(%stage, count = matches.len(), "matter stage matched");
        Some(MatchResult {
            matches,
            stage: Some(*stage),
        })
    });

    found.unwrap_or_else(|| {
        tracing::debug!(candidates = candidates.len(), "no matter matched");
        MatchResult::default()
    })
}

/// [`match_matter`] with [`Threshold::DEFAULT`].
pub fn match_matter_default<'a>(text: &str, candidates: &'a [Candidate]) -> MatchResult<'a> {
    match_matter(text, candidates, Threshold::DEFAULT)
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

/// First candidate whose external ID appears as a whole token.
///
/// Stops at the first hit; IDs are expected to be unique.
fn match_external_id<'a>(
    query: &Query<'_>,
    candidates: &'a [Candidate],
) -> Option<Vec<MatterMatch<'a>>> {
    let hit = candidates.iter().find(|candidate| {
        candidate
            .external_id()
            .is_some_and(|id| contains_token(query.text, id))
    })?;
    Some(vec![MatterMatch::exact(hit)])
}

fn contains_token(text: &str, token: &str) -> bool {
    let pattern = format!(r"\b{}\b", regex::escape(token));
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(text),
        Err(err) => {
            tracing::warn!(token, error = %err, "skipping unmatchable external ID");
            false
        }
    }
}

/// Every candidate whose name occurs in the text, ignoring case.
fn match_exact_name<'a>(
    query: &Query<'_>,
    candidates: &'a [Candidate],
) -> Option<Vec<MatterMatch<'a>>> {
    non_empty(
        candidates
            .iter()
            .filter(|candidate| query.lower.contains(&candidate.name.to_lowercase()))
            .map(MatterMatch::exact)
            .collect(),
    )
}

/// Every candidate whose name words all occur in the text, in any order.
fn match_word_set<'a>(
    query: &Query<'_>,
    candidates: &'a [Candidate],
) -> Option<Vec<MatterMatch<'a>>> {
    non_empty(
        candidates
            .iter()
            .filter(|candidate| name_words_present(query, &candidate.name))
            .map(MatterMatch::exact)
            .collect(),
    )
}

fn name_words_present(query: &Query<'_>, name: &str) -> bool {
    let name = name.to_lowercase();
    let mut tokens = WORD_RE.find_iter(&name).map(|m| m.as_str()).peekable();
    if tokens.peek().is_none() {
        return false;
    }
    tokens.all(|token| {
        if is_short_ascii(token) {
            query.words.contains(token)
        } else {
            query.lower.contains(token)
        }
    })
}

/// Short plain-ASCII words like "id" or "at" would match inside almost any text.
fn is_short_ascii(token: &str) -> bool {
    token.len() <= SHORT_TOKEN_MAX_LEN && token.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Candidates scoring at or above the threshold, best first.
fn match_fuzzy<'a>(
    query: &Query<'_>,
    candidates: &'a [Candidate],
) -> Option<Vec<MatterMatch<'a>>> {
    let mut scored: Vec<MatterMatch<'a>> = candidates
        .iter()
        .filter_map(|candidate| {
            let score = fuzzy::score(query.text, &candidate.search_text());
            tracing::trace!(matter = %candidate.id, score, "fuzzy score");
            (score >= query.threshold.value()).then_some(MatterMatch {
                candidate,
                score: Some(score),
            })
        })
        .collect();
    // Stable sort keeps input order among equal scores.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    non_empty(scored)
}
