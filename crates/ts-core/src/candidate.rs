//! Matter candidates offered to the resolver.

use serde::{Deserialize, Serialize};

use crate::types::{MatterId, ValidationError};

/// A read-only projection of a matter, supplied by the caller for one call.
///
/// The resolver only reads and ranks candidates; it never stores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CandidateRecord")]
pub struct Candidate {
    /// Caller-owned identifier.
    pub id: MatterId,
    /// Display name, never blank.
    pub name: String,
    /// Short code such as a request-form number ("1404").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
}

impl Candidate {
    /// Creates a candidate with only an ID and a display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "matter name",
            });
        }
        Ok(Self {
            id: MatterId::new(id)?,
            name,
            external_id: None,
            description: None,
            client: None,
        })
    }

    #[must_use]
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the external identifier if it is present and not blank.
    pub fn external_id(&self) -> Option<&str> {
        self.external_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// The text fuzzy scoring compares against: name plus description.
    pub(crate) fn search_text(&self) -> String {
        match self.description.as_deref() {
            Some(description) if !description.trim().is_empty() => {
                format!("{} {description}", self.name)
            }
            _ => self.name.clone(),
        }
    }
}

/// Unvalidated wire form of a [`Candidate`].
#[derive(Deserialize)]
struct CandidateRecord {
    id: String,
    name: String,
    #[serde(default)]
    external_id: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    client: Option<String>,
}

impl TryFrom<CandidateRecord> for Candidate {
    type Error = ValidationError;

    fn try_from(record: CandidateRecord) -> Result<Self, Self::Error> {
        let mut candidate = Self::new(record.id, record.name)?;
        candidate.external_id = record.external_id;
        candidate.description = record.description;
        candidate.client = record.client;
        Ok(candidate)
    }
}
