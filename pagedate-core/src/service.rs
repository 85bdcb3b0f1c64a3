//! Request-level operations: fetch a URL, then extract from it.
//!
//! These never fail. A fetch error turns into a low-confidence result with
//! an `errors` entry, so callers always receive a well-formed result.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info_span, Instrument};

use crate::config::{BatchExtractRequest, ExtractConfig, ExtractRequest};
use crate::extract::extract_from_html;
use crate::http::HttpClient;
use crate::types::TimestampResult;

/// Default number of URLs fetched at once by [`extract_batch`].
pub const DEFAULT_BATCH_CONCURRENCY: usize = 5;

/// Fetch one URL and extract its timestamps.
pub async fn extract_url<C>(client: &C, request: &ExtractRequest) -> TimestampResult
where
    C: HttpClient + ?Sized,
{
    let config = request.config.clone().unwrap_or_default();
    fetch_and_extract(client, &request.url, &config)
        .instrument(info_span!("extract_url", url = %request.url))
        .await
}

/// Fetch and extract several URLs concurrently.
///
/// Results come back in input order, one per URL. At most `concurrency`
/// fetches are in flight at a time, clamped to `1..=Semaphore::MAX_PERMITS`.
pub async fn extract_batch<C>(
    client: Arc<C>,
    request: BatchExtractRequest,
    concurrency: usize,
) -> Vec<TimestampResult>
where
    C: HttpClient + ?Sized + 'static,
{
    let BatchExtractRequest { urls, config } = request;
    let config = Arc::new(config.unwrap_or_default());
    let concurrency = concurrency.clamp(1, Semaphore::MAX_PERMITS);
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut tasks = JoinSet::new();

    tracing::info!(urls = urls.len(), concurrency, "starting batch extraction");

    for (index, url) in urls.iter().cloned().enumerate() {
        let client = Arc::clone(&client);
        let config = Arc::clone(&config);
        let semaphore = Arc::clone(&semaphore);

        tasks.spawn(
            async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => fetch_and_extract(client.as_ref(), &url, &config).await,
                    Err(e) => TimestampResult::failed(url, format!("batch cancelled: {e}")),
                };
                (index, result)
            }
            .instrument(info_span!("batch_item", index)),
        );
    }

    let mut results: Vec<Option<TimestampResult>> = vec![None; urls.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => results[index] = Some(result),
            Err(e) => tracing::error!(error = %e, "batch task failed"),
        }
    }

    // A slot left empty means its task panicked or was cancelled.
    results
        .into_iter()
        .zip(urls)
        .map(|(result, url)| {
            result.unwrap_or_else(|| TimestampResult::failed(url, "extraction task failed"))
        })
        .collect()
}

async fn fetch_and_extract<C>(client: &C, url: &str, config: &ExtractConfig) -> TimestampResult
where
    C: HttpClient + ?Sized,
{
    match client.fetch_page(url, config).await {
        Ok(page) => extract_from_html(&page.html, &page.headers, url, &config.extract_options()),
        Err(e) => {
            tracing::warn!(url, error = %e, "fetch failed");
            TimestampResult::failed(url, format!("Failed to fetch {url}: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockClient;
    use crate::types::Confidence;

    const ARTICLE: &str = r#"<html><head>
        <meta name="article:published_time" content="2023-01-15T10:30:00Z">
    </head></html>"#;

    #[tokio::test]
    async fn single_url_success() {
        let client = MockClient::new().with_page(
            "https://example.com/a",
            ARTICLE,
            &[("last-modified", "Mon, 16 Jan 2023 14:20:00 GMT")],
        );
        let request = ExtractRequest {
            url: "https://example.com/a".to_string(),
            config: None,
        };

        let result = extract_url(&client, &request).await;
        assert_eq!(result.url, "https://example.com/a");
        assert_eq!(result.sources.len(), 2);
        assert_eq!(result.confidence, Confidence::High);
        assert!(result.errors.is_none());
        assert!(result.modified_at.is_some());
    }

    #[tokio::test]
    async fn fetch_failure_becomes_error_result() {
        let client =
            MockClient::new().with_error("https://example.com/down", "network unreachable");
        let request = ExtractRequest {
            url: "https://example.com/down".to_string(),
            config: None,
        };

        let result = extract_url(&client, &request).await;
        assert!(result.sources.is_empty());
        assert_eq!(result.confidence, Confidence::Low);
        let errors = result.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("network unreachable"));
    }

    #[tokio::test]
    async fn batch_preserves_input_order() {
        let client = Arc::new(
            MockClient::new()
                .with_html("https://example.com/1", ARTICLE)
                .with_error("https://example.com/2", "timed out")
                .with_html("https://example.com/3", "<html></html>"),
        );
        let request = BatchExtractRequest {
            urls: vec![
                "https://example.com/1".to_string(),
                "https://example.com/2".to_string(),
                "https://example.com/3".to_string(),
            ],
            config: None,
        };

        let results = extract_batch(client, request, 2).await;
        let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://example.com/1", "https://example.com/2", "https://example.com/3"]
        );
        assert_eq!(results[0].confidence, Confidence::High);
        assert!(results[1].errors.is_some());
        assert!(results[2].errors.is_none());
        assert!(results[2].sources.is_empty());
    }

    #[tokio::test]
    async fn batch_config_disables_heuristics() {
        let html = r#"<html><body><time datetime="2023-05-15T12:00:00Z"></time></body></html>"#;
        let client = Arc::new(MockClient::new().with_html("https://example.com/t", html));
        let request = BatchExtractRequest {
            urls: vec!["https://example.com/t".to_string()],
            config: Some(ExtractConfig {
                enable_heuristics: false,
                ..Default::default()
            }),
        };

        let results = extract_batch(client, request, 0).await;
        assert_eq!(results.len(), 1);
        assert!(results[0].sources.is_empty());
    }

    #[tokio::test]
    async fn oversized_concurrency_is_clamped() {
        let client = Arc::new(MockClient::new().with_html("https://example.com/1", ARTICLE));
        let request = BatchExtractRequest {
            urls: vec!["https://example.com/1".to_string()],
            config: None,
        };

        let results = extract_batch(client, request, usize::MAX).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].confidence, Confidence::High);
    }

    #[tokio::test]
    async fn empty_batch() {
        let client = Arc::new(MockClient::new());
        let request = BatchExtractRequest {
            urls: vec![],
            config: None,
        };
        assert!(extract_batch(client, request, 3).await.is_empty());
    }
}
