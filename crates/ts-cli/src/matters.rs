//! Loading the matter candidate list.

use std::path::Path;

use anyhow::{Context, Result};
use ts_core::Candidate;

/// Read candidates from a JSON array file.
///
/// A missing file is treated as an empty list so that parsing still reports
/// duration and date before any matters have been set up.
pub fn load_candidates(path: &Path) -> Result<Vec<Candidate>> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "matters file not found, using no candidates");
        return Ok(Vec::new());
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let candidates: Vec<Candidate> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse matters in {}", path.display()))?;
    tracing::debug!(count = candidates.len(), "loaded matter candidates");
    Ok(candidates)
}
