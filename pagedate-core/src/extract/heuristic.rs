//! Free-text heuristics over date-ish elements. Only runs when enabled.

use std::sync::LazyLock;

use scraper::Selector;

use super::{candidate, element_text, PageContext, SourceExtractor};
use crate::config::ExtractOptions;
use crate::normalize::TEXT_DATE_PATTERNS;
use crate::types::{Confidence, Mechanism, TimestampSource};

static DATE_TEXT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("time, .date, .published, .timestamp, .created, .modified")
        .expect("Invalid date text selector")
});

static TIME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("time").expect("Invalid time selector"));

pub struct HeuristicExtractor;

impl SourceExtractor for HeuristicExtractor {
    fn mechanism(&self) -> Mechanism {
        Mechanism::Heuristic
    }

    fn enabled(&self, opts: &ExtractOptions) -> bool {
        opts.enable_heuristics
    }

    fn extract(&self, page: &PageContext<'_>) -> Vec<TimestampSource> {
        let mut sources = text_pattern_sources(page);
        sources.extend(time_element_sources(page));
        sources
    }
}

/// Regex matches inside the combined text of date-ish elements.
fn text_pattern_sources(page: &PageContext<'_>) -> Vec<TimestampSource> {
    let text = page
        .document
        .select(&DATE_TEXT_SELECTOR)
        .map(|el| el.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ");

    if text.trim().is_empty() {
        return Vec::new();
    }

    TEXT_DATE_PATTERNS
        .iter()
        .flat_map(|re| re.find_iter(&text))
        .filter_map(|m| {
            candidate(Mechanism::Heuristic, "text-pattern", m.as_str(), Confidence::Low)
        })
        .collect()
}

/// `<time datetime>` attributes, or the element text when there is none.
fn time_element_sources(page: &PageContext<'_>) -> Vec<TimestampSource> {
    page.document
        .select(&TIME_SELECTOR)
        .filter_map(|el| match el.value().attr("datetime") {
            Some(datetime) if !datetime.is_empty() => {
                candidate(Mechanism::Heuristic, "time-datetime", datetime, Confidence::Medium)
            }
            _ => candidate(
                Mechanism::Heuristic,
                "time-text",
                &element_text(&el),
                Confidence::Low,
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Headers;
    use scraper::Html;

    fn extract(html: &str) -> Vec<TimestampSource> {
        let document = Html::parse_document(html);
        let headers = Headers::new();
        HeuristicExtractor.extract(&PageContext {
            document: &document,
            headers: &headers,
        })
    }

    #[test]
    fn disabled_by_options() {
        assert!(!HeuristicExtractor.enabled(&ExtractOptions {
            enable_heuristics: false
        }));
        assert!(HeuristicExtractor.enabled(&ExtractOptions::default()));
    }

    #[test]
    fn patterns_inside_date_classes() {
        let sources = extract(
            r#"<html><body>
                <div class="date">Published on June 1, 2023</div>
                <span class="timestamp">2023/06/02</span>
                <p>Not scanned: 7/7/2023</p>
            </body></html>"#,
        );

        let values: Vec<&str> = sources.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, vec!["2023/06/02", "June 1, 2023"]);
        assert!(sources
            .iter()
            .all(|s| s.field == "text-pattern" && s.confidence == Confidence::Low));
    }

    #[test]
    fn time_datetime_is_medium_text_is_low() {
        let sources = extract(
            r#"<html><body>
                <time datetime="2023-05-15T12:00:00Z">last spring</time>
                <time>2023-05-16</time>
                <time datetime="">nonsense</time>
            </body></html>"#,
        );

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].field, "time-datetime");
        assert_eq!(sources[0].confidence, Confidence::Medium);
        assert_eq!(sources[1].field, "time-text");
        assert_eq!(sources[1].value, "2023-05-16");
        assert_eq!(sources[1].confidence, Confidence::Low);
    }

    #[test]
    fn invalid_datetime_does_not_fall_back_to_text() {
        let sources = extract(r#"<html><body><time datetime="PT5M">2023-05-16</time></body></html>"#);
        assert!(sources.is_empty());
    }

    #[test]
    fn text_patterns_precede_time_elements() {
        let sources = extract(
            r#"<html><body><time datetime="2023-05-15T12:00:00Z">May 15, 2023</time></body></html>"#,
        );
        let fields: Vec<&str> = sources.iter().map(|s| s.field.as_str()).collect();
        assert_eq!(fields, vec!["text-pattern", "time-datetime"]);
    }

    #[test]
    fn adjacent_elements_do_not_fuse() {
        let sources = extract(
            r#"<html><body><span class="date">2023</span><span class="date">12/1/2023</span></body></html>"#,
        );
        let values: Vec<&str> = sources.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, vec!["12/1/2023"]);
    }
}
