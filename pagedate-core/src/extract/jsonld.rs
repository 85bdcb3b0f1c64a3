//! JSON-LD `<script type="application/ld+json">` blocks.

use std::sync::LazyLock;

use scraper::Selector;
use serde_json::Value;

use super::{candidate, PageContext, SourceExtractor};
use crate::types::{Confidence, Mechanism, TimestampSource};

static JSONLD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("Invalid JSON-LD selector")
});

const JSONLD_FIELDS: &[&str] = &["datePublished", "dateModified", "dateCreated"];

pub struct JsonLdExtractor;

impl SourceExtractor for JsonLdExtractor {
    fn mechanism(&self) -> Mechanism {
        Mechanism::StructuredData
    }

    fn extract(&self, page: &PageContext<'_>) -> Vec<TimestampSource> {
        let mut sources = Vec::new();

        for script in page.document.select(&JSONLD_SELECTOR) {
            let raw = script.text().collect::<String>();
            let json: Value = match serde_json::from_str(&sanitize_json(&raw)) {
                Ok(v) => v,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping malformed JSON-LD block");
                    continue;
                }
            };

            for item in top_level_items(&json) {
                for field in JSONLD_FIELDS {
                    if let Some(value) = item.get(*field).and_then(Value::as_str) {
                        sources.extend(candidate(
                            Mechanism::StructuredData,
                            field,
                            value,
                            Confidence::High,
                        ));
                    }
                }
            }
        }

        sources
    }
}

/// Items of a JSON-LD block: the array elements or the single object,
/// each followed by the members of its `@graph`, if any.
fn top_level_items(json: &Value) -> Vec<&Value> {
    let roots: Vec<&Value> = match json {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![json],
        _ => Vec::new(),
    };

    let mut items = Vec::with_capacity(roots.len());
    for root in roots {
        if !root.is_object() {
            continue;
        }
        items.push(root);
        if let Some(Value::Array(graph)) = root.get("@graph") {
            items.extend(graph.iter().filter(|v| v.is_object()));
        }
    }
    items
}

/// Escape raw control characters that some sites leave inside JSON string
/// literals (literal newlines and tabs mostly).
fn sanitize_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in json.chars() {
        if !in_string {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
            continue;
        }

        if escaped {
            escaped = false;
            out.push(c);
            continue;
        }

        match c {
            '\\' => {
                escaped = true;
                out.push(c);
            }
            '"' => {
                in_string = false;
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }

    out
}
