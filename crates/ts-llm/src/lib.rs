//! Claude API integration for the timesheet assistant.
//!
//! Asks the model to pull a matter name, duration, date and description out
//! of a free-form time entry. Callers treat this as an optional first pass
//! and fall back to `ts-core` parsing whenever it errors or returns nothing
//! usable.

mod client;
mod entry;

use thiserror::Error;

pub use client::{Client, DEFAULT_MODEL};
pub use entry::{AiEntry, EntryRequest};

/// Errors from the extraction client.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key is blank")]
    MissingApiKey,
    #[error("could not set up HTTP client: {0}")]
    Setup(#[source] reqwest::Error),
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("Claude API returned {status}: {message}")]
    Status { status: u16, message: String },
    /// The reply could not be turned into an [`AiEntry`].
    #[error("unusable model reply: {0}")]
    Reply(String),
}
