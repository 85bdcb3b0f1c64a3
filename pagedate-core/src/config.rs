//! Per-call extraction configuration.
//!
//! There is no global configuration instance. Callers pass an
//! `ExtractConfig` explicitly, usually `ExtractConfig::default()` or
//! `ExtractConfig::from_env()`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; pagedate/0.1; +https://github.com/pagedate/pagedate)";

/// Options for fetching and extracting a single page.
///
/// Only `enable_heuristics` reaches the extraction core. The remaining
/// fields are forwarded to the HTTP client untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractConfig {
    /// Request timeout in milliseconds.
    #[serde(alias = "timeout")]
    pub timeout_ms: u64,
    pub user_agent: String,
    pub follow_redirects: bool,
    pub max_redirects: usize,
    pub enable_heuristics: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            follow_redirects: true,
            max_redirects: 5,
            enable_heuristics: true,
        }
    }
}

impl ExtractConfig {
    /// Defaults overlaid with environment variables.
    ///
    /// Environment variables:
    /// - `PAGEDATE_TIMEOUT_MS`: request timeout in milliseconds
    /// - `PAGEDATE_USER_AGENT`: user agent string
    /// - `PAGEDATE_DISABLE_HEURISTICS`: "true" or "1" to skip free-text heuristics
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = std::env::var("PAGEDATE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            config.timeout_ms = ms;
        }

        if let Ok(ua) = std::env::var("PAGEDATE_USER_AGENT") {
            if !ua.trim().is_empty() {
                config.user_agent = ua;
            }
        }

        if std::env::var("PAGEDATE_DISABLE_HEURISTICS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false)
        {
            config.enable_heuristics = false;
        }

        config
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Options that affect the extraction core.
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            enable_heuristics: self.enable_heuristics,
        }
    }
}

/// The subset of configuration the extraction core reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub enable_heuristics: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            enable_heuristics: true,
        }
    }
}

/// Request for a single URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ExtractConfig>,
}

/// Request for several URLs sharing one configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchExtractRequest {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ExtractConfig>,
}
