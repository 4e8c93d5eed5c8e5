//! Parse command: turn one time entry into billing data.
//!
//! When AI extraction is enabled it runs first. Its matter is accepted only if
//! it names a known candidate exactly; otherwise local matching runs on the
//! same text and candidates.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use ts_core::{
    Candidate, EntryOptions, ParsedEntry, calculate_units, clean_description, parse_entry,
};
use ts_llm::{AiEntry, Client, EntryRequest};

use crate::Config;
use crate::commands::util::{candidate_label, parse_date_arg};
use crate::matters::load_candidates;

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Entry text, e.g. "Worked on GSC Matter - draft email 1h 30m".
    pub text: String,
    /// Date to use when the text names none (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// What the caller should do with the matched matters.
#[derive(Debug, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
enum Decision<'a> {
    /// Exactly one matter: log against it.
    Resolved { matter: &'a Candidate },
    /// Several matters: the user must pick one.
    Ambiguous { candidates: Vec<&'a Candidate> },
    /// No matter: the user must pick or create one.
    Unmatched,
}

impl<'a> Decision<'a> {
    fn from_candidates(mut candidates: Vec<&'a Candidate>) -> Self {
        match candidates.len() {
            0 => Self::Unmatched,
            1 => Self::Resolved {
                matter: candidates.remove(0),
            },
            _ => Self::Ambiguous { candidates },
        }
    }
}

/// Where the matter decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum MatterSource {
    Ai,
    Local,
}

#[derive(Debug, Serialize)]
struct ParseOutput<'a> {
    minutes: u32,
    units: i64,
    date: Option<NaiveDate>,
    description: String,
    source: MatterSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<&'static str>,
    #[serde(flatten)]
    decision: Decision<'a>,
}

pub async fn run<W: Write>(writer: &mut W, args: &ParseArgs, config: &Config) -> Result<()> {
    let candidates = load_candidates(&config.matters_path)?;

    let ai = match config.ai_api_key() {
        Some(api_key) => try_ai_entry(api_key, &config.ai.model, &args.text, &candidates).await,
        None => None,
    };

    let options = EntryOptions {
        threshold: config.threshold,
        fallback_date: args.date,
    };
    let local = parse_entry(&args.text, &candidates, &options);
    let output = combine(&args.text, &candidates, ai, local);

    if output.minutes == 0 {
        bail!("could not extract duration from text; include a time such as '1h' or '30m'");
    }

    if args.json {
        let json = serde_json::to_string_pretty(&output).context("failed to serialize JSON")?;
        writeln!(writer, "{json}")?;
    } else {
        write_human(writer, &output)?;
    }
    Ok(())
}

/// Merge an optional AI extraction with the local parse.
///
/// AI fields win where present. The AI matter counts only when it names a
/// candidate exactly.
fn combine<'a>(
    text: &str,
    candidates: &'a [Candidate],
    ai: Option<AiEntry>,
    local: ParsedEntry<'a>,
) -> ParseOutput<'a> {
    let ai = ai.unwrap_or_default();
    let ai_matter = ai
        .matter_name
        .as_deref()
        .and_then(|name| candidates.iter().find(|c| c.name == name));

    let minutes = ai
        .duration_minutes
        .filter(|m| *m > 0)
        .unwrap_or(local.minutes);
    let date = ai.date.or(local.date);

    let (decision, source, stage, description) = match ai_matter {
        Some(matter) => {
            tracing::debug!(matter = %matter.id, "using AI matter");
            let description = ai
                .description
                .unwrap_or_else(|| clean_description(text, &matter.name));
            (
                Decision::Resolved { matter },
                MatterSource::Ai,
                None,
                description,
            )
        }
        None => {
            let stage = local.matches.stage().map(|stage| stage.as_str());
            let decision = Decision::from_candidates(local.matches.candidates().collect());
            let description = match (&decision, ai.description) {
                (Decision::Resolved { .. }, Some(description)) => description,
                _ => local.description,
            };
            (decision, MatterSource::Local, stage, description)
        }
    };

    ParseOutput {
        minutes,
        units: calculate_units(i64::from(minutes)),
        date,
        description,
        source,
        stage,
        decision,
    }
}

/// Try AI extraction, returning `None` on any failure.
async fn try_ai_entry(
    api_key: &str,
    model: &str,
    text: &str,
    candidates: &[Candidate],
) -> Option<AiEntry> {
    let client = match Client::new(api_key) {
        Ok(client) => client,
        Err(err) => {
            tracing::warn!(error = %err, "failed to create AI client");
            return None;
        }
    };

    let request = EntryRequest {
        text: text.to_string(),
        matter_names: candidates.iter().map(|c| c.name.clone()).collect(),
    };
    match client.extract_entry(model, &request).await {
        Ok(entry) => Some(entry),
        Err(err) => {
            tracing::warn!(error = %err, "AI extraction failed, falling back to local parsing");
            None
        }
    }
}

fn write_human<W: Write>(writer: &mut W, output: &ParseOutput<'_>) -> Result<()> {
    match &output.decision {
        Decision::Resolved { matter } => {
            writeln!(writer, "Matter: {}", candidate_label(matter))?;
        }
        Decision::Ambiguous { candidates } => {
            writeln!(
                writer,
                "Matter: ambiguous, {} candidates match:",
                candidates.len()
            )?;
            for candidate in candidates {
                writeln!(writer, "  - {}: {}", candidate.id, candidate_label(candidate))?;
            }
        }
        Decision::Unmatched => {
            writeln!(writer, "Matter: no match; pick or create one")?;
        }
    }
    let via = match (output.source, output.stage) {
        (MatterSource::Ai, _) => "ai".to_string(),
        (MatterSource::Local, Some(stage)) => stage.to_string(),
        (MatterSource::Local, None) => "-".to_string(),
    };
    writeln!(writer, "Matched by: {via}")?;
    writeln!(
        writer,
        "Duration: {} minutes ({} units)",
        output.minutes, output.units
    )?;
    match output.date {
        Some(date) => writeln!(writer, "Date: {date}")?,
        None => writeln!(writer, "Date: (none)")?,
    }
    writeln!(writer, "Description: {}", output.description)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use std::path::Path;
    use ts_core::Threshold;

    fn top_id<'a>(decision: &Decision<'a>) -> Option<&'a str> {
        match decision {
            Decision::Resolved { matter } => Some(matter.id.as_str()),
            Decision::Ambiguous { candidates } => candidates.first().map(|c| c.id.as_str()),
            Decision::Unmatched => None,
        }
    }

    fn write_matters(dir: &Path) -> Config {
        let path = dir.join("matters.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "2", "name": "MOU Review", "external_id": "1404"},
                {"id": "4", "name": "GSC Matter", "external_id": "2000", "description": "General Service Center requests"},
                {"id": "7", "name": "Lease", "description": "Office lease"},
                {"id": "8", "name": "Bank Facility"}
            ]"#,
        )
        .unwrap();
        Config {
            matters_path: path,
            threshold: Threshold::DEFAULT,
            ..Config::default()
        }
    }

    async fn run_to_string(args: &ParseArgs, config: &Config) -> Result<String> {
        let mut output = Vec::new();
        run(&mut output, args, config).await?;
        Ok(String::from_utf8(output).unwrap())
    }

    fn args(text: &str) -> ParseArgs {
        ParseArgs {
            text: text.to_string(),
            date: None,
            json: false,
        }
    }

    #[tokio::test]
    async fn parse_resolved_entry() {
        let temp = tempfile::tempdir().unwrap();
        let config = write_matters(temp.path());

        let output = run_to_string(
            &args("Worked on GSC Matter - draft email 1h 30m on 16 Feb 2026"),
            &config,
        )
        .await
        .unwrap();

        assert_snapshot!(output.trim_end(), @r"
Matter: GSC Matter [2000]
Matched by: exact_name
Duration: 90 minutes (15 units)
Date: 2026-02-16
Description: draft email 1h 30m on 16 Feb 2026
");
    }

    #[tokio::test]
    async fn parse_ambiguous_entry_lists_candidates() {
        let temp = tempfile::tempdir().unwrap();
        let config = write_matters(temp.path());
        let mut parse_args = args("bank facility call then lease markup 45m");
        parse_args.date = NaiveDate::from_ymd_opt(2026, 3, 2);

        let output = run_to_string(&parse_args, &config).await.unwrap();

        assert_snapshot!(output.trim_end(), @r"
Matter: ambiguous, 2 candidates match:
  - 7: Lease
  - 8: Bank Facility
Matched by: exact_name
Duration: 45 minutes (8 units)
Date: 2026-03-02
Description: bank facility call then lease markup 45m
");
    }

    #[tokio::test]
    async fn parse_unmatched_entry() {
        let temp = tempfile::tempdir().unwrap();
        let config = write_matters(temp.path());
        let mut parse_args = args("Unknown work 30m");
        parse_args.date = NaiveDate::from_ymd_opt(2026, 2, 15);

        let output = run_to_string(&parse_args, &config).await.unwrap();

        assert_snapshot!(output.trim_end(), @r"
Matter: no match; pick or create one
Matched by: -
Duration: 30 minutes (5 units)
Date: 2026-02-15
Description: Unknown work 30m
");
    }

    #[tokio::test]
    async fn parse_requires_duration() {
        let temp = tempfile::tempdir().unwrap();
        let config = write_matters(temp.path());

        let err = run_to_string(&args("Worked on GSC Matter"), &config)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("could not extract duration"));
    }

    #[tokio::test]
    async fn parse_json_output() {
        let temp = tempfile::tempdir().unwrap();
        let config = write_matters(temp.path());
        let mut parse_args = args("Matter 1404 MOU for 2 hours on 16 Feb 2026");
        parse_args.json = true;

        let output = run_to_string(&parse_args, &config).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["decision"], "resolved");
        assert_eq!(value["matter"]["id"], "2");
        assert_eq!(value["source"], "local");
        assert_eq!(value["stage"], "external_id");
        assert_eq!(value["minutes"], 120);
        assert_eq!(value["units"], 20);
        assert_eq!(value["date"], "2026-02-16");
    }

    #[test]
    fn ai_matter_wins_when_it_names_a_candidate() {
        let candidates = vec![
            Candidate::new("2", "MOU Review").unwrap(),
            Candidate::new("4", "GSC Matter").unwrap(),
        ];
        let text = "Worked on GSC Matter, emails 15m";
        let local = parse_entry(text, &candidates, &EntryOptions::default());
        let ai = AiEntry {
            matter_name: Some("MOU Review".to_string()),
            duration_minutes: Some(20),
            date: NaiveDate::from_ymd_opt(2026, 1, 5),
            description: None,
        };

        let output = combine(text, &candidates, Some(ai), local);

        assert_eq!(output.source, MatterSource::Ai);
        assert_eq!(top_id(&output.decision), Some("2"));
        assert_eq!(output.minutes, 20);
        assert_eq!(output.units, 4);
        assert_eq!(output.date, NaiveDate::from_ymd_opt(2026, 1, 5));
        assert_eq!(output.description, text);
    }

    #[test]
    fn unknown_ai_matter_falls_back_to_local_match() {
        let candidates = vec![
            Candidate::new("2", "MOU Review").unwrap(),
            Candidate::new("4", "GSC Matter").unwrap(),
        ];
        let text = "Worked on GSC Matter, emails 15m";
        let local = parse_entry(text, &candidates, &EntryOptions::default());
        let ai = AiEntry {
            matter_name: Some("Invented Matter".to_string()),
            ..AiEntry::default()
        };

        let output = combine(text, &candidates, Some(ai), local);

        assert_eq!(output.source, MatterSource::Local);
        assert_eq!(output.stage, Some("exact_name"));
        assert_eq!(top_id(&output.decision), Some("4"));
        assert_eq!(output.minutes, 15);
        assert_eq!(output.description, "emails 15m");
    }

    #[test]
    fn missing_ai_result_uses_local_parse() {
        let candidates = vec![Candidate::new("4", "GSC Matter").unwrap()];
        let text = "GSC Matter review 1h";
        let local = parse_entry(text, &candidates, &EntryOptions::default());

        let output = combine(text, &candidates, None, local);

        assert_eq!(output.source, MatterSource::Local);
        assert_eq!(output.minutes, 60);
        assert_eq!(output.description, text);
    }
}
