//! `<meta name|property=...>` date tags.

use super::{candidate, first_content, PageContext, SourceExtractor};
use crate::types::{Confidence, Mechanism, TimestampSource};

/// Meta names checked, in order. Each may appear as `name` or `property`.
pub const META_DATE_FIELDS: &[&str] = &[
    "article:published_time",
    "article:modified_time",
    "date",
    "pubdate",
    "publishdate",
    "last-modified",
    "dc.date.created",
    "dc.date.modified",
    "dcterms.created",
    "dcterms.modified",
];

pub struct MetaTagExtractor;

impl SourceExtractor for MetaTagExtractor {
    fn mechanism(&self) -> Mechanism {
        Mechanism::MetaTag
    }

    fn extract(&self, page: &PageContext<'_>) -> Vec<TimestampSource> {
        META_DATE_FIELDS
            .iter()
            .filter_map(|field| {
                let selector = format!(r#"meta[name="{field}"], meta[property="{field}"]"#);
                let content = first_content(page.document, &selector)?;
                candidate(Mechanism::MetaTag, field, content, Confidence::High)
            })
            .collect()
    }
}
