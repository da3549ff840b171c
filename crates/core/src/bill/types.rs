use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::BillIdError;

/// Longest bill id accepted, matching the width of the upstream id column.
pub const MAX_BILL_ID_LEN: usize = 100;

/// Longest text handed to the summarizer, in characters.
pub const MAX_SUMMARY_INPUT_CHARS: usize = 12_000;

/// Jurisdiction-scoped bill identifier, e.g. `ocd-bill/4b3c...` or `AB-123`.
///
/// Ids are trimmed on parse and may not contain whitespace or control
/// characters, so they are safe to use as cache keys and URL path segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BillId(String);

impl BillId {
    /// Parses and validates a bill id.
    pub fn parse(raw: &str) -> Result<Self, BillIdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BillIdError::Empty);
        }
        if trimmed.len() > MAX_BILL_ID_LEN {
            return Err(BillIdError::TooLong);
        }
        if let Some(c) = trimmed
            .chars()
            .find(|c| c.is_whitespace() || c.is_control())
        {
            return Err(BillIdError::InvalidCharacter(c));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BillId {
    type Err = BillIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BillId {
    type Error = BillIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BillId> for String {
    fn from(id: BillId) -> Self {
        id.0
    }
}

/// Hex-encoded SHA-256 fingerprint of a raw upstream bill payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceHash(String);

impl SourceHash {
    /// Wraps an already computed hex digest.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bill sponsor as reported upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sponsor {
    pub name: String,
    pub party: Option<String>,
    pub primary: bool,
}

/// Vote counts from the most recent recorded vote on a bill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub yes: u32,
    pub no: u32,
    pub other: u32,
    pub motion: Option<String>,
    pub date: Option<String>,
}

/// Cached snapshot of a bill.
///
/// Owned by the cache store and only ever replaced wholesale by the
/// synchronization engine after a successful upstream fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillRecord {
    pub id: BillId,
    /// Human identifier such as "AB 123".
    pub identifier: String,
    pub title: String,
    pub jurisdiction: String,
    pub session: String,
    pub chamber: String,
    /// Description of the latest action, or "No actions".
    pub status: String,
    pub first_action_date: Option<String>,
    pub latest_action_date: Option<String>,
    pub sponsors: Vec<Sponsor>,
    pub votes: Option<VoteTally>,
    pub abstract_text: Option<String>,
    pub source_url: Option<String>,
    pub fetched_at: DateTime<Utc>,
    pub source_hash: SourceHash,
}

impl BillRecord {
    /// Builds the summarizer input for this bill: the abstract when present,
    /// otherwise the title, capped at [`MAX_SUMMARY_INPUT_CHARS`].
    pub fn summary_request(&self) -> SummaryRequest {
        let text = self
            .abstract_text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.title);

        SummaryRequest {
            bill_id: self.id.clone(),
            title: self.title.clone(),
            text: text.chars().take(MAX_SUMMARY_INPUT_CHARS).collect(),
        }
    }
}

/// Input handed to a summarizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub bill_id: BillId,
    pub title: String,
    pub text: String,
}

/// Summary content as produced by a model, before it is tied to a bill version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSummary {
    pub text: String,
    pub key_provisions: Vec<String>,
    pub impact: String,
    pub model: String,
}

/// Cached AI summary, valid only for the bill content whose hash it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub bill_id: BillId,
    pub source_hash: SourceHash,
    pub text: String,
    pub key_provisions: Vec<String>,
    pub impact: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
}

impl SummaryRecord {
    /// Ties generated content to the exact bill version it was produced from.
    pub fn for_bill(
        bill: &BillRecord,
        generated: GeneratedSummary,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            bill_id: bill.id.clone(),
            source_hash: bill.source_hash.clone(),
            text: generated.text,
            key_provisions: generated.key_provisions,
            impact: generated.impact,
            model: generated.model,
            generated_at,
        }
    }

    /// Returns true if this summary was generated from the given bill version.
    pub fn matches(&self, bill: &BillRecord) -> bool {
        self.bill_id == bill.id && self.source_hash == bill.source_hash
    }
}

/// What a public caller receives for a bill lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillView {
    pub bill: BillRecord,
    pub summary: Option<SummaryRecord>,
    /// Set when a summary was requested but could not be produced.
    pub summary_unavailable: bool,
    /// Set when the bill is served from cache past its TTL because the
    /// upstream refresh failed.
    pub stale: bool,
}

impl BillView {
    /// A bill served without a summary.
    pub fn bill_only(bill: BillRecord) -> Self {
        Self {
            bill,
            summary: None,
            summary_unavailable: false,
            stale: false,
        }
    }
}
