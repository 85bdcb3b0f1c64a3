//! Timestamp extraction from a parsed page.
//!
//! Each source mechanism implements [`SourceExtractor`] and is registered in
//! [`EXTRACTORS`]. The orchestrator walks that table in order, so the order of
//! `TimestampResult::sources` always follows it. Adding a mechanism means
//! adding one table entry.

mod headers;
mod heuristic;
mod jsonld;
mod meta;
mod microdata;
mod open_graph;
mod twitter;

use scraper::{Html, Selector};

use crate::config::ExtractOptions;
use crate::consolidate::consolidate;
use crate::normalize::is_valid_date;
use crate::types::{Confidence, Headers, Mechanism, TimestampResult, TimestampSource};

pub use headers::HttpHeaderExtractor;
pub use heuristic::HeuristicExtractor;
pub use jsonld::JsonLdExtractor;
pub use meta::MetaTagExtractor;
pub use microdata::MicrodataExtractor;
pub use open_graph::OpenGraphExtractor;
pub use twitter::TwitterCardExtractor;

/// Everything an extractor may look at for one page.
pub struct PageContext<'a> {
    pub document: &'a Html,
    pub headers: &'a Headers,
}

/// One extraction mechanism. Implementations never fail: anything missing
/// or malformed simply yields no candidate.
pub trait SourceExtractor: Send + Sync {
    fn mechanism(&self) -> Mechanism;

    /// Whether this extractor runs under the given options.
    fn enabled(&self, _opts: &ExtractOptions) -> bool {
        true
    }

    fn extract(&self, page: &PageContext<'_>) -> Vec<TimestampSource>;
}

/// Extractors in invocation order.
pub static EXTRACTORS: &[&dyn SourceExtractor] = &[
    &MetaTagExtractor,
    &HttpHeaderExtractor,
    &JsonLdExtractor,
    &MicrodataExtractor,
    &OpenGraphExtractor,
    &TwitterCardExtractor,
    &HeuristicExtractor,
];

/// Run every enabled extractor and concatenate their candidates.
pub fn collect_sources(page: &PageContext<'_>, opts: &ExtractOptions) -> Vec<TimestampSource> {
    let mut sources = Vec::new();
    for extractor in EXTRACTORS.iter().filter(|e| e.enabled(opts)) {
        let found = extractor.extract(page);
        tracing::trace!(
            mechanism = extractor.mechanism().as_str(),
            count = found.len(),
            "extractor finished"
        );
        sources.extend(found);
    }
    sources
}

/// Extract and consolidate timestamps from an already parsed document.
pub fn extract_timestamps(
    document: &Html,
    headers: &Headers,
    url: &str,
    opts: &ExtractOptions,
) -> TimestampResult {
    let page = PageContext { document, headers };
    let sources = collect_sources(&page, opts);
    let consolidated = consolidate(&sources);

    tracing::debug!(
        url,
        sources = sources.len(),
        confidence = ?consolidated.confidence,
        "extracted timestamps"
    );

    TimestampResult {
        url: url.to_string(),
        created_at: consolidated.created_at,
        modified_at: consolidated.modified_at,
        published_at: consolidated.published_at,
        sources,
        confidence: consolidated.confidence,
        errors: None,
    }
}

/// Parse `html` and extract timestamps from it.
pub fn extract_from_html(
    html: &str,
    headers: &Headers,
    url: &str,
    opts: &ExtractOptions,
) -> TimestampResult {
    let document = Html::parse_document(html);
    extract_timestamps(&document, headers, url, opts)
}

/// Build a candidate if `value` normalizes; otherwise drop it.
pub(crate) fn candidate(
    mechanism: Mechanism,
    field: &str,
    value: &str,
    confidence: Confidence,
) -> Option<TimestampSource> {
    if is_valid_date(value) {
        Some(TimestampSource::new(mechanism, field, value, confidence))
    } else {
        tracing::trace!(
            mechanism = mechanism.as_str(),
            field,
            value,
            "discarding unparseable value"
        );
        None
    }
}

/// `content` of the first element matching `selector` that has one.
pub(crate) fn first_content<'a>(document: &'a Html, selector: &str) -> Option<&'a str> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .find_map(|el| el.value().attr("content"))
}

/// Trimmed text content of an element.
pub(crate) fn element_text(el: &scraper::ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
