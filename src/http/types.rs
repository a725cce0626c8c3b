//! Transport types and traits
//!
//! Defines the request/response contract between the pagination engine and
//! whatever actually talks to the network.

use crate::error::Result;
use crate::types::{JsonValue, StringMap};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::fmt;
use std::future::Future;
use tracing::warn;
use url::Url;

/// One page request, built from the current cursor
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// Full URL, query string included
    pub url: Url,
    /// Request headers
    pub headers: StringMap,
    /// Whether the body should be parsed as JSON
    pub json: bool,
    /// Zero-based index of the page being requested
    pub page_index: u64,
}

impl PageRequest {
    /// Create a request for a URL with no headers
    pub fn new(url: Url) -> Self {
        Self {
            url,
            headers: StringMap::new(),
            json: true,
            page_index: 0,
        }
    }

    /// Look up a query parameter of the request URL
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Look up a header, ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status line and headers of a page response
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    /// HTTP status code
    pub status: u16,
    /// Response headers (case-insensitive lookup)
    pub headers: HeaderMap,
}

impl Default for ResponseMeta {
    fn default() -> Self {
        Self::ok()
    }
}

impl ResponseMeta {
    /// Create response metadata
    pub fn new(status: u16, headers: HeaderMap) -> Self {
        Self { status, headers }
    }

    /// A 200 response with no headers
    pub fn ok() -> Self {
        Self::new(200, HeaderMap::new())
    }

    /// Add a header, skipping names or values that are not valid HTTP
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            _ => warn!("Skipping invalid response header {name:?}"),
        }
        self
    }

    /// Get a header value as text
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A fetched page: response metadata plus the parsed body
#[derive(Debug, Clone)]
pub struct PageResult {
    /// Status and headers
    pub meta: ResponseMeta,
    /// Parsed body
    pub body: JsonValue,
}

impl PageResult {
    /// Create a page result
    pub fn new(meta: ResponseMeta, body: JsonValue) -> Self {
        Self { meta, body }
    }

    /// A 200 response with no headers and the given body
    pub fn from_body(body: JsonValue) -> Self {
        Self::new(ResponseMeta::ok(), body)
    }
}

/// Fetches one page for the engine
///
/// Implementations own connection handling, timeouts and content decoding.
/// The engine never issues a second `fetch` before the previous one resolved.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the page described by `request`
    async fn fetch(&self, request: PageRequest) -> Result<PageResult>;
}

/// Transport backed by an async closure
pub struct FnTransport<F> {
    f: F,
}

/// Wrap an async closure as a [`Transport`]
///
/// ```rust,ignore
/// let transport = transport_fn(|request: PageRequest| async move {
///     Ok(PageResult::from_body(serde_json::json!([1, 2, 3])))
/// });
/// ```
pub fn transport_fn<F, Fut>(f: F) -> FnTransport<F>
where
    F: Fn(PageRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<PageResult>> + Send + 'static,
{
    FnTransport { f }
}

#[async_trait]
impl<F, Fut> Transport for FnTransport<F>
where
    F: Fn(PageRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<PageResult>> + Send + 'static,
{
    async fn fetch(&self, request: PageRequest) -> Result<PageResult> {
        (self.f)(request).await
    }
}

impl<F> fmt::Debug for FnTransport<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransport").finish_non_exhaustive()
    }
}
