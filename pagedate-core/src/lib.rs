pub mod classify;
pub mod config;
pub mod consolidate;
pub mod error;
pub mod extract;
pub mod http;
pub mod normalize;
pub mod service;
pub mod types;

pub use classify::{classify, Role};
pub use config::{BatchExtractRequest, ExtractConfig, ExtractOptions, ExtractRequest};
pub use consolidate::{consolidate, Consolidated};
pub use error::FetchError;
pub use extract::{extract_from_html, extract_timestamps, SourceExtractor, EXTRACTORS};
pub use http::{HttpClient, MockClient, MockResponse, ReqwestClient};
pub use normalize::normalize_date;
pub use service::{extract_batch, extract_url, DEFAULT_BATCH_CONCURRENCY};
pub use types::{Confidence, FetchedPage, Headers, Mechanism, TimestampResult, TimestampSource};
