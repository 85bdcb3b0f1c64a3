//! HTTP client trait and implementations.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::config::ExtractConfig;
use crate::error::FetchError;
use crate::types::{FetchedPage, Headers};

use super::charset::decode_body;

/// Trait for HTTP clients, enabling mockability in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch a page, honouring the timeout, user agent and redirect
    /// settings in `config`.
    async fn fetch_page(
        &self,
        url: &str,
        config: &ExtractConfig,
    ) -> Result<FetchedPage, FetchError>;
}

/// Production client backed by reqwest.
///
/// A reqwest client is built lazily for the most recent configuration and
/// reused while callers keep passing the same one.
#[derive(Default)]
pub struct ReqwestClient {
    cached: Mutex<Option<(ExtractConfig, reqwest::Client)>>,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn client_for(&self, config: &ExtractConfig) -> Result<reqwest::Client, FetchError> {
        let mut cached = self
            .cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some((cached_config, client)) = cached.as_ref() {
            if cached_config == config {
                return Ok(client.clone());
            }
        }

        let redirect = if config.follow_redirects {
            reqwest::redirect::Policy::limited(config.max_redirects)
        } else {
            reqwest::redirect::Policy::none()
        };

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .redirect(redirect)
            .build()?;

        *cached = Some((config.clone(), client.clone()));
        Ok(client)
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn fetch_page(
        &self,
        url: &str,
        config: &ExtractConfig,
    ) -> Result<FetchedPage, FetchError> {
        let parsed =
            url::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
        let client = self.client_for(config)?;

        tracing::debug!(url, "network: fetching");
        let response = client.get(parsed).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::debug!(url, status = %status, "network: request failed");
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let final_url = response.url().to_string();
        let mut headers = Headers::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                // HeaderName is already lower-case; keep the first of repeated headers.
                headers
                    .entry(name.as_str().to_string())
                    .or_insert_with(|| value.to_string());
            }
        }

        let bytes = response.bytes().await?;
        let html = decode_body(&bytes, headers.get("content-type").map(String::as_str));

        tracing::debug!(
            url,
            final_url = %final_url,
            status = %status,
            bytes = bytes.len(),
            "network: fetched"
        );

        Ok(FetchedPage {
            html,
            headers,
            final_url,
            status: status.as_u16(),
        })
    }
}

/// Mock response for testing.
#[derive(Clone)]
pub enum MockResponse {
    Page(FetchedPage),
    Error(String),
}

/// Mock HTTP client for testing.
#[derive(Default)]
pub struct MockClient {
    responses: HashMap<String, MockResponse>,
}

impl MockClient {
    /// Create a new empty mock client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response for a URL.
    pub fn with_response(mut self, url: &str, response: MockResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    /// Add a 200 page with no headers.
    pub fn with_html(self, url: &str, html: &str) -> Self {
        self.with_page(url, html, &[])
    }

    /// Add a 200 page with the given headers (names are lower-cased).
    pub fn with_page(self, url: &str, html: &str, headers: &[(&str, &str)]) -> Self {
        let page = FetchedPage {
            html: html.to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                .collect(),
            final_url: url.to_string(),
            status: 200,
        };
        self.with_response(url, MockResponse::Page(page))
    }

    /// Add an error response for a URL.
    pub fn with_error(self, url: &str, error: &str) -> Self {
        self.with_response(url, MockResponse::Error(error.to_string()))
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn fetch_page(
        &self,
        url: &str,
        _config: &ExtractConfig,
    ) -> Result<FetchedPage, FetchError> {
        match self.responses.get(url) {
            Some(MockResponse::Page(page)) => Ok(page.clone()),
            Some(MockResponse::Error(e)) => Err(FetchError::Mock(e.clone())),
            None => Err(FetchError::Mock(format!("No mock response for URL: {}", url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_returns_page_with_lowercased_headers() {
        let client = MockClient::new().with_page(
            "https://example.com/a",
            "<html></html>",
            &[("Last-Modified", "Mon, 16 Jan 2023 14:20:00 GMT")],
        );

        let page = client
            .fetch_page("https://example.com/a", &ExtractConfig::default())
            .await
            .unwrap();
        assert_eq!(page.status, 200);
        assert_eq!(
            page.headers.get("last-modified").map(String::as_str),
            Some("Mon, 16 Jan 2023 14:20:00 GMT")
        );
    }

    #[tokio::test]
    async fn mock_errors() {
        let client = MockClient::new().with_error("https://example.com/down", "connection refused");
        let config = ExtractConfig::default();

        let err = client.fetch_page("https://example.com/down", &config).await.unwrap_err();
        assert_eq!(err.to_string(), "connection refused");

        let err = client.fetch_page("https://example.com/other", &config).await.unwrap_err();
        assert!(err.to_string().contains("No mock response"));
    }

    #[tokio::test]
    async fn reqwest_client_rejects_invalid_url() {
        let client = ReqwestClient::new();
        let err = client
            .fetch_page("not a url", &ExtractConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[test]
    fn reqwest_client_reuses_client_for_same_config() {
        let client = ReqwestClient::new();
        let config = ExtractConfig::default();
        client.client_for(&config).unwrap();
        client.client_for(&config).unwrap();

        let cached = client.cached.lock().unwrap();
        assert_eq!(cached.as_ref().map(|(c, _)| c), Some(&config));
    }
}
