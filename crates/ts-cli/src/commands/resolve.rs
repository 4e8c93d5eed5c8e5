//! Match command: show which matters an entry resolves to.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use ts_core::{Candidate, MatchResult, Threshold, match_matter};

use crate::Config;
use crate::commands::util::candidate_label;
use crate::matters::load_candidates;

#[derive(Debug, Args)]
pub struct MatchArgs {
    /// Entry text to resolve.
    pub text: String,
    /// Fuzzy threshold (0-100), overriding the configured value.
    #[arg(long)]
    pub threshold: Option<i64>,
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct MatchOutput<'a> {
    stage: Option<&'static str>,
    matches: Vec<MatchJson<'a>>,
}

#[derive(Serialize)]
struct MatchJson<'a> {
    #[serde(flatten)]
    candidate: &'a Candidate,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<u8>,
}

pub fn run<W: Write>(writer: &mut W, args: &MatchArgs, config: &Config) -> Result<()> {
    let threshold = match args.threshold {
        Some(value) => Threshold::new(value)?,
        None => config.threshold,
    };
    let candidates = load_candidates(&config.matters_path)?;
    let result = match_matter(&args.text, &candidates, threshold);

    if args.json {
        write_json(writer, &result)
    } else {
        write_human(writer, &result)
    }
}

fn write_json<W: Write>(writer: &mut W, result: &MatchResult<'_>) -> Result<()> {
    let output = MatchOutput {
        stage: result.stage().map(|stage| stage.as_str()),
        matches: result
            .matches()
            .iter()
            .map(|m| MatchJson {
                candidate: m.candidate,
                score: m.score,
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&output).context("failed to serialize JSON")?;
    writeln!(writer, "{json}")?;
    Ok(())
}

fn write_human<W: Write>(writer: &mut W, result: &MatchResult<'_>) -> Result<()> {
    let Some(stage) = result.stage() else {
        writeln!(writer, "No matching matters.")?;
        return Ok(());
    };

    writeln!(writer, "Matched by {stage}:")?;
    for m in result.matches() {
        let label = candidate_label(m.candidate);
        match m.score {
            Some(score) => writeln!(writer, "- {}: {label} (score {score})", m.candidate.id)?,
            None => writeln!(writer, "- {}: {label}", m.candidate.id)?,
        }
    }
    Ok(())
}
