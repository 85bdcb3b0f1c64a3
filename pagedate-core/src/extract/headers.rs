//! HTTP response headers.

use super::{candidate, PageContext, SourceExtractor};
use crate::types::{Confidence, Mechanism, TimestampSource};

/// Header names (lower-cased) and the confidence each earns.
const HEADER_FIELDS: &[(&str, Confidence)] = &[
    ("last-modified", Confidence::Medium),
    ("date", Confidence::Low),
];

pub struct HttpHeaderExtractor;

impl SourceExtractor for HttpHeaderExtractor {
    fn mechanism(&self) -> Mechanism {
        Mechanism::HttpHeader
    }

    fn extract(&self, page: &PageContext<'_>) -> Vec<TimestampSource> {
        HEADER_FIELDS
            .iter()
            .filter_map(|(name, confidence)| {
                let value = page.headers.get(*name)?;
                candidate(Mechanism::HttpHeader, name, value, *confidence)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Headers;
    use scraper::Html;

    fn extract(headers: &[(&str, &str)]) -> Vec<TimestampSource> {
        let document = Html::parse_document("");
        let headers: Headers = headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        HttpHeaderExtractor.extract(&PageContext {
            document: &document,
            headers: &headers,
        })
    }

    #[test]
    fn last_modified_is_medium_date_is_low() {
        let sources = extract(&[
            ("date", "Tue, 17 Jan 2023 08:00:00 GMT"),
            ("last-modified", "Mon, 16 Jan 2023 14:20:00 GMT"),
            ("content-type", "text/html"),
        ]);

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].field, "last-modified");
        assert_eq!(sources[0].confidence, Confidence::Medium);
        assert_eq!(sources[1].field, "date");
        assert_eq!(sources[1].confidence, Confidence::Low);
    }

    #[test]
    fn invalid_header_is_skipped() {
        let sources = extract(&[("last-modified", "0")]);
        assert!(sources.is_empty());
    }
}
