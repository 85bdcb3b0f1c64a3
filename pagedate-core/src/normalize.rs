//! Date normalization: turn a raw date string into an absolute UTC instant.
//!
//! Parsing runs in two passes. The strict pass accepts RFC 3339, RFC 2822
//! (HTTP dates) and ISO-8601 variants. The permissive pass accepts common
//! human-written formats and finally looks for one of those formats
//! embedded in a longer string. Values without a zone are taken as UTC.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;

const MONTHS: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";

/// Date patterns recognised inside free text. Shared with the heuristic
/// extractor so both agree on what a "date-looking" substring is.
pub(crate) static TEXT_DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b\d{1,2}/\d{1,2}/\d{4}\b".to_string(),
        r"\b\d{4}/\d{1,2}/\d{1,2}\b".to_string(),
        format!(r"(?i)\b(?:{MONTHS})\s+\d{{1,2}},\s*\d{{4}}\b"),
        format!(r"(?i)\b\d{{1,2}}\s+(?:{MONTHS})\s+\d{{4}}\b"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid date pattern regex"))
    .collect()
});

/// ISO calendar date inside longer text, e.g. "Updated 2023-04-01 by staff".
static EMBEDDED_ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").expect("Invalid ISO date regex"));

const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const HUMAN_DATETIME_FORMATS: &[&str] = &[
    "%a %b %e %H:%M:%S %Y",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const HUMAN_DATE_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%B %d,%Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%A, %B %d, %Y",
    "%A, %d %B %Y",
    "%a, %d %b %Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%Y.%m.%d",
];

/// Parse `raw` into a UTC instant. Returns `None` for empty or
/// unrecognised input; never panics.
pub fn normalize_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    parse_strict(s)
        .or_else(|| parse_permissive(s))
        .or_else(|| parse_embedded(s))
}

/// Whether `raw` normalizes at all.
pub fn is_valid_date(raw: &str) -> bool {
    normalize_date(raw).is_some()
}

fn parse_strict(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    // A bare "Z" suffix without full RFC 3339 shape, e.g. "2023-01-15T10:30Z".
    let naive_input = s.strip_suffix('Z').unwrap_or(s);
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(naive_input, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(midnight_utc)
}

fn parse_permissive(s: &str) -> Option<DateTime<Utc>> {
    // Collapse runs of whitespace so "June  1,   2023" still matches.
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");

    for fmt in HUMAN_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&collapsed, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    for fmt in HUMAN_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&collapsed, fmt) {
            return Some(midnight_utc(date));
        }
    }
    None
}

fn parse_embedded(s: &str) -> Option<DateTime<Utc>> {
    TEXT_DATE_PATTERNS
        .iter()
        .chain(std::iter::once(&*EMBEDDED_ISO_DATE))
        .filter_map(|re| re.find(s))
        .find_map(|m| {
            let fragment = m.as_str();
            // A fragment equal to the whole input already failed above.
            if fragment.len() == s.len() {
                return None;
            }
            parse_strict(fragment).or_else(|| parse_permissive(fragment))
        })
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}
