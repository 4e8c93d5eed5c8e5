//! Prompt construction and reply parsing for entry extraction.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;

use crate::LlmError;

/// First flat JSON object in a reply that may carry prose or fences around it.
static JSON_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{[^{}]*\}").unwrap());

/// Input for entry extraction.
#[derive(Debug, Clone)]
pub struct EntryRequest {
    /// The user's raw time entry.
    pub text: String,
    /// Matter names the model may choose from.
    pub matter_names: Vec<String>,
}

/// Fields the model extracted. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AiEntry {
    pub matter_name: Option<String>,
    pub duration_minutes: Option<u32>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

pub(crate) fn build_prompt(request: &EntryRequest) -> String {
    let matters = if request.matter_names.is_empty() {
        "(none)".to_string()
    } else {
        request
            .matter_names
            .iter()
            .map(|name| format!("- {name}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"You are a legal timesheet assistant. Extract structured information from this time entry.

Available matters:
{matters}

User entry: "{text}"

Reply with one JSON object and nothing else:
{{"matter_name": "...", "duration_minutes": 90, "date": "YYYY-MM-DD", "description": "..."}}

- matter_name: copied exactly from the list above, or null
- duration_minutes: whole minutes, or null
- date: YYYY-MM-DD, or null if the entry names no date
- description: a short, clean summary of the work"#,
        text = request.text,
    )
}

/// Wire form of the model's JSON. Everything is optional and loosely typed.
#[derive(Deserialize)]
struct ReplyFields {
    #[serde(default)]
    matter_name: Option<String>,
    #[serde(default)]
    duration_minutes: Option<i64>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Parse the model's reply, dropping fields that are blank or malformed.
pub(crate) fn parse_reply(text: &str) -> Result<AiEntry, LlmError> {
    let object = JSON_OBJECT_RE
        .find(text)
        .ok_or_else(|| LlmError::Reply("no JSON object in reply".to_string()))?;
    let fields: ReplyFields =
        serde_json::from_str(object.as_str()).map_err(|err| LlmError::Reply(err.to_string()))?;

    Ok(AiEntry {
        matter_name: trimmed(fields.matter_name),
        duration_minutes: fields.duration_minutes.and_then(|m| u32::try_from(m).ok()),
        date: fields
            .date
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok()),
        description: trimmed(fields.description),
    })
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
