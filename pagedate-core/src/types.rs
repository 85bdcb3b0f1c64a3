use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Extraction technique that produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mechanism {
    MetaTag,
    HttpHeader,
    StructuredData,
    Microdata,
    OpenGraph,
    SocialCard,
    Heuristic,
}

impl Mechanism {
    /// Tie-break rank used by consolidation when confidences are equal.
    /// Lower ranks win.
    pub fn priority(&self) -> u8 {
        match self {
            Mechanism::StructuredData => 0,
            Mechanism::Microdata => 1,
            Mechanism::MetaTag => 2,
            Mechanism::OpenGraph => 3,
            Mechanism::SocialCard => 4,
            Mechanism::HttpHeader => 5,
            Mechanism::Heuristic => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mechanism::MetaTag => "meta-tag",
            Mechanism::HttpHeader => "http-header",
            Mechanism::StructuredData => "structured-data",
            Mechanism::Microdata => "microdata",
            Mechanism::OpenGraph => "open-graph",
            Mechanism::SocialCard => "social-card",
            Mechanism::Heuristic => "heuristic",
        }
    }
}

/// Three-level ordinal. Declaration order gives `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// One candidate timestamp reading, as found in the page.
///
/// `value` is kept verbatim. It is only emitted when it normalizes to an
/// instant, and the instant is re-derived during consolidation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampSource {
    pub mechanism: Mechanism,
    pub field: String,
    pub value: String,
    pub confidence: Confidence,
}

impl TimestampSource {
    pub fn new(
        mechanism: Mechanism,
        field: impl Into<String>,
        value: impl Into<String>,
        confidence: Confidence,
    ) -> Self {
        Self {
            mechanism,
            field: field.into(),
            value: value.into(),
            confidence,
        }
    }
}

/// Output of one extraction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampResult {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub sources: Vec<TimestampSource>,
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl TimestampResult {
    /// Result for a URL whose fetch or parse failed before extraction ran.
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            created_at: None,
            modified_at: None,
            published_at: None,
            sources: Vec::new(),
            confidence: Confidence::Low,
            errors: Some(vec![error.into()]),
        }
    }
}

/// A fetched document as handed to the extraction core.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchedPage {
    pub html: String,
    /// Lower-cased header name to value.
    pub headers: Headers,
    pub final_url: String,
    pub status: u16,
}

pub type Headers = std::collections::HashMap<String, String>;
