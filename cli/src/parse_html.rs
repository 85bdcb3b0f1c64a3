use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use pagedate_core::{extract_from_html, ExtractOptions, Headers};

/// Extract timestamps from an HTML file and print the result as JSON.
pub fn parse_html(
    file: &Path,
    url: &str,
    raw_headers: &[String],
    enable_heuristics: bool,
) -> Result<()> {
    let html = fs::read_to_string(file)
        .with_context(|| format!("Failed to read HTML file: {}", file.display()))?;
    let headers = parse_headers(raw_headers)?;

    let result = extract_from_html(&html, &headers, url, &ExtractOptions { enable_heuristics });
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Parse "Name: value" pairs into a lower-cased header map.
fn parse_headers(raw: &[String]) -> Result<Headers> {
    raw.iter()
        .map(|h| {
            let (name, value) = h
                .split_once(':')
                .with_context(|| format!("Header must look like \"name: value\": {h}"))?;
            Ok((name.trim().to_ascii_lowercase(), value.trim().to_string()))
        })
        .collect()
}
