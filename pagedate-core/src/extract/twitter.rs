//! Twitter card label/data pairs that happen to carry a date.

use super::{candidate, first_content, PageContext, SourceExtractor};
use crate::types::{Confidence, Mechanism, TimestampSource};

pub struct TwitterCardExtractor;

impl SourceExtractor for TwitterCardExtractor {
    fn mechanism(&self) -> Mechanism {
        Mechanism::SocialCard
    }

    fn extract(&self, page: &PageContext<'_>) -> Vec<TimestampSource> {
        let content = first_content(page.document, r#"meta[name="twitter:data1"]"#)
            .filter(|c| !c.is_empty())
            .or_else(|| first_content(page.document, r#"meta[name="twitter:label1"]"#));

        content
            .filter(|c| c.to_lowercase().contains("date"))
            .and_then(|c| candidate(Mechanism::SocialCard, "twitter:data1", c, Confidence::Medium))
            .into_iter()
            .collect()
    }
}
