//! Fetching pages for extraction.
//!
//! Extraction never touches the network itself; everything goes through the
//! [`HttpClient`] trait so callers and tests can swap the transport.

pub(crate) mod charset;
mod client;

pub use client::{HttpClient, MockClient, MockResponse, ReqwestClient};
