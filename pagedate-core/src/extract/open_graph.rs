//! OpenGraph `og:*` time properties.

use super::{candidate, first_content, PageContext, SourceExtractor};
use crate::types::{Confidence, Mechanism, TimestampSource};

pub const OPEN_GRAPH_FIELDS: &[&str] = &[
    "og:article:published_time",
    "og:article:modified_time",
    "og:updated_time",
];

pub struct OpenGraphExtractor;

impl SourceExtractor for OpenGraphExtractor {
    fn mechanism(&self) -> Mechanism {
        Mechanism::OpenGraph
    }

    fn extract(&self, page: &PageContext<'_>) -> Vec<TimestampSource> {
        OPEN_GRAPH_FIELDS
            .iter()
            .filter_map(|field| {
                let content = first_content(page.document, &format!(r#"meta[property="{field}"]"#))?;
                candidate(Mechanism::OpenGraph, field, content, Confidence::High)
            })
            .collect()
    }
}
