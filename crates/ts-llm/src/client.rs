//! HTTP transport for the Messages API.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::LlmError;
use crate::entry::{AiEntry, EntryRequest, build_prompt, parse_reply};

/// Model used when the configuration does not name one.
pub const DEFAULT_MODEL: &str = "claude-haiku-4-5";

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
/// Entry extraction waits at most this long before local parsing takes over.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_REPLY_TOKENS: u32 = 256;

/// Claude API client for entry extraction.
///
/// Cloning is cheap and clones share one connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for the public Messages endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(LlmError::Setup)?;

        Ok(Self {
            http,
            api_key,
            endpoint: MESSAGES_URL.to_string(),
        })
    }

    /// Sends requests to `endpoint` instead of the public API.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Ask the model for the fields of one time entry.
    pub async fn extract_entry(
        &self,
        model: &str,
        request: &EntryRequest,
    ) -> Result<AiEntry, LlmError> {
        let body = MessagesBody {
            model,
            max_tokens: MAX_REPLY_TOKENS,
            temperature: 0.0,
            messages: [UserTurn {
                role: "user",
                content: build_prompt(request),
            }],
        };

        tracing::debug!(model, matters = request.matter_names.len(), "requesting AI extraction");
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
                message: error_message(&raw),
            });
        }

        let reply: MessagesReply =
            serde_json::from_str(&raw).map_err(|err| LlmError::Reply(err.to_string()))?;
        let text = reply_text(reply.content)?;
        let entry = parse_reply(&text)?;
        tracing::debug!(?entry, "AI extraction succeeded");
        Ok(entry)
    }
}

#[derive(Serialize)]
struct MessagesBody<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [UserTurn; 1],
}

#[derive(Serialize)]
struct UserTurn {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesReply {
    content: Vec<ReplyBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ReplyBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Concatenated text blocks; other block kinds are ignored.
fn reply_text(blocks: Vec<ReplyBlock>) -> Result<String, LlmError> {
    let texts: Vec<String> = blocks
        .into_iter()
        .filter_map(|block| match block {
            ReplyBlock::Text { text } => Some(text),
            ReplyBlock::Other => None,
        })
        .collect();
    if texts.is_empty() {
        return Err(LlmError::Reply("reply has no text blocks".to_string()));
    }
    Ok(texts.join("\n"))
}

/// The API's own error message when the body carries one, else the raw body.
fn error_message(raw: &str) -> String {
    #[derive(Deserialize)]
    struct Envelope {
        error: Detail,
    }

    #[derive(Deserialize)]
    struct Detail {
        message: String,
    }

    serde_json::from_str::<Envelope>(raw)
        .map_or_else(|_| raw.trim().to_string(), |envelope| envelope.error.message)
}
