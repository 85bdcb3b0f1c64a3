//! Decode response bodies to UTF-8 using the declared charset.

use std::sync::LazyLock;

use encoding_rs::Encoding;
use regex::bytes::Regex;

/// `<meta charset=...>` or the charset parameter of an http-equiv content type.
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*?charset\s*=\s*["']?\s*([A-Za-z0-9._:-]+)"#)
        .expect("Invalid meta charset regex")
});

/// Only the head of the document is scanned for a meta declaration.
const META_SCAN_LIMIT: usize = 1024;

/// Decode `bytes` using, in order: the `Content-Type` charset, a meta
/// charset near the top of the document, then UTF-8 (lossy).
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let declared = content_type
        .and_then(charset_from_content_type)
        .or_else(|| charset_from_meta(bytes));

    if let Some(encoding) = declared.filter(|e| *e != encoding_rs::UTF_8) {
        let (decoded, _, had_errors) = encoding.decode(bytes);
        if had_errors {
            tracing::debug!(
                encoding = encoding.name(),
                "replacement characters while decoding body"
            );
        }
        return decoded.into_owned();
    }

    String::from_utf8_lossy(bytes).into_owned()
}

fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    let lower = content_type.to_ascii_lowercase();
    let value = lower
        .split(';')
        .filter_map(|param| param.trim().strip_prefix("charset="))
        .next()?
        .trim_matches(|c: char| c == '"' || c == '\'' || c.is_whitespace());

    if value.is_empty() {
        return None;
    }
    Encoding::for_label(value.as_bytes())
}

fn charset_from_meta(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SCAN_LIMIT)];
    let label = META_CHARSET.captures(head)?.get(1)?.as_bytes();
    Encoding::for_label(label)
}
