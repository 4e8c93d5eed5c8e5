//! String similarity scores on a 0–100 scale.
//!
//! All scorers first normalize both inputs: lower-case, every
//! non-alphanumeric character replaced by a space, outer whitespace trimmed.
//! Lengths are counted in `char`s so Thai and other non-Latin text scores the
//! same way Latin text does.
//!
//! Whole-string LCS is bit-parallel, `O(|a| * |b| / 64)`. [`partial_ratio`]
//! combs the shorter string against the longer once and reads every window's
//! LCS from that, so a long entry costs `O(|short| * |long|)` rather than a
//! fresh table per window.

use std::collections::{BTreeSet, HashMap};

/// Best of [`token_set_ratio`] and [`partial_ratio`].
pub fn score(a: &str, b: &str) -> u8 {
    token_set_ratio(a, b).max(partial_ratio(a, b))
}

/// Indel similarity of the normalized strings.
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = normalize(a).chars().collect();
    let b: Vec<char> = normalize(b).chars().collect();
    round_score(indel_similarity(&a, &b))
}

/// Similarity of the shorter string to its best-aligned slice of the longer.
///
/// Slices that hang off either end of the longer string are considered too,
/// so "gsc" still scores well against a string that merely starts with "gs".
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = normalize(a).chars().collect();
    let b: Vec<char> = normalize(b).chars().collect();
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 100,
        (true, false) | (false, true) => return 0,
        (false, false) => {}
    }

    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let n = short.len();
    let len = long.len();
    let exits = comb_strands(short, long);

    // (start, end) of every slice: full windows, then edge prefixes and suffixes.
    let full_windows = (0..=len - n).map(|start| (start, start + n));
    let prefixes = (1..n).map(|k| (0, k));
    let suffixes = (1..n).map(|k| (len - k, len));

    let mut best = 0.0_f64;
    for (start, end) in full_windows.chain(prefixes).chain(suffixes) {
        let common = slice_lcs(&exits, start, end);
        best = best.max(similarity(common, n + end - start));
        // Nothing beats a perfect window.
        if common == n {
            break;
        }
    }
    round_score(best)
}

/// Similarity that ignores word order and repeated words.
///
/// Returns 100 when every word of one side also appears on the other.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let a = normalize(a);
    let b = normalize(b);
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0;
    }

    let common: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let only_a: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let only_b: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();
    if !common.is_empty() && (only_a.is_empty() || only_b.is_empty()) {
        return 100;
    }

    let common = common.join(" ");
    let with_a = join_nonempty(&common, &only_a.join(" "));
    let with_b = join_nonempty(&common, &only_b.join(" "));

    // Joined tokens are already normalized, and rounding keeps the order of scores.
    ratio(&common, &with_a)
        .max(ratio(&common, &with_b))
        .max(ratio(&with_a, &with_b))
}

fn normalize(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .trim()
        .to_string()
}

fn join_nonempty(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}

/// `200 * LCS / (|a| + |b|)`, with two empty inputs counting as identical.
fn indel_similarity(a: &[char], b: &[char]) -> f64 {
    similarity(longest_common_subsequence(a, b), a.len() + b.len())
}

#[expect(
    clippy::cast_precision_loss,
    reason = "entry texts are far shorter than 2^52 chars"
)]
fn similarity(common: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    200.0 * common as f64 / total as f64
}

/// Bit-parallel LCS length (Hyyrö), one bit per char of the shorter side.
fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let (pattern, text) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if pattern.is_empty() {
        return 0;
    }

    let blocks = pattern.len().div_ceil(64);
    let mut masks: HashMap<char, Vec<u64>> = HashMap::new();
    for (i, &c) in pattern.iter().enumerate() {
        masks.entry(c).or_insert_with(|| vec![0; blocks])[i / 64] |= 1 << (i % 64);
    }

    // A zero bit marks a pattern position used by the LCS so far.
    let mut state = vec![u64::MAX; blocks];
    for c in text {
        let Some(mask) = masks.get(c) else {
            continue;
        };
        let mut carry = false;
        for (word, &bits) in state.iter_mut().zip(mask) {
            let matched = *word & bits;
            let (sum, overflow_a) = word.overflowing_add(matched);
            let (sum, overflow_b) = sum.overflowing_add(u64::from(carry));
            carry = overflow_a || overflow_b;
            *word = sum | (*word & !matched);
        }
    }
    state.iter().map(|word| word.count_zeros() as usize).sum()
}

/// Seaweed combing of `short` against `long` (semi-local LCS).
///
/// Entry `j` is the bottom column where the strand entering at top column `j`
/// of `long` leaves, or `None` when it leaves through the right edge.
fn comb_strands(short: &[char], long: &[char]) -> Vec<Option<usize>> {
    let m = short.len();
    // Strands `0..m` enter from the left, `m..m + long.len()` from the top.
    let mut top: Vec<usize> = (m..m + long.len()).collect();
    for (row, &c) in short.iter().enumerate() {
        let mut left = row;
        for (strand, &d) in top.iter_mut().zip(long) {
            // Strands swap on a match, or when they have already crossed once.
            if c == d || left > *strand {
                std::mem::swap(&mut left, strand);
            }
        }
    }

    let mut exits = vec![None; long.len()];
    for (column, &strand) in top.iter().enumerate() {
        if let Some(start) = strand.checked_sub(m) {
            exits[start] = Some(column);
        }
    }
    exits
}

/// LCS of the combed short string against `long[start..end]`.
fn slice_lcs(exits: &[Option<usize>], start: usize, end: usize) -> usize {
    let unmatched = exits[start..end]
        .iter()
        .filter(|exit| exit.is_some_and(|column| column < end))
        .count();
    end - start - unmatched
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is clamped to 0..=100 first"
)]
fn round_score(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round_ties_even() as u8
}
