//! schema.org microdata `itemprop` dates.

use super::{candidate, element_text, PageContext, SourceExtractor};
use crate::types::{Confidence, Mechanism, TimestampSource};
use scraper::Selector;

const MICRODATA_FIELDS: &[&str] = &["datePublished", "dateModified"];

pub struct MicrodataExtractor;

impl SourceExtractor for MicrodataExtractor {
    fn mechanism(&self) -> Mechanism {
        Mechanism::Microdata
    }

    fn extract(&self, page: &PageContext<'_>) -> Vec<TimestampSource> {
        let mut sources = Vec::new();

        for field in MICRODATA_FIELDS {
            let Ok(selector) = Selector::parse(&format!(r#"[itemprop="{field}"]"#)) else {
                continue;
            };
            for el in page.document.select(&selector) {
                // Check for content attribute first (common for meta tags)
                let value = match el.value().attr("content") {
                    Some(content) if !content.is_empty() => content.to_string(),
                    _ => element_text(&el),
                };
                sources.extend(candidate(Mechanism::Microdata, field, &value, Confidence::High));
            }
        }

        sources
    }
}
