//! Matters command: list configured candidates.

use std::io::Write;

use anyhow::{Context, Result};

use crate::Config;
use crate::commands::util::candidate_label;
use crate::matters::load_candidates;

pub fn run<W: Write>(writer: &mut W, config: &Config, json: bool) -> Result<()> {
    let candidates = load_candidates(&config.matters_path)?;

    if json {
        let json = serde_json::to_string_pretty(&candidates).context("failed to serialize JSON")?;
        writeln!(writer, "{json}")?;
        return Ok(());
    }

    if candidates.is_empty() {
        writeln!(
            writer,
            "No matters configured. Add them to {}",
            config.matters_path.display()
        )?;
        return Ok(());
    }

    for candidate in &candidates {
        write!(writer, "{}: {}", candidate.id, candidate_label(candidate))?;
        match candidate.client.as_deref() {
            Some(client) => writeln!(writer, " ({client})")?,
            None => writeln!(writer)?,
        }
    }
    Ok(())
}
