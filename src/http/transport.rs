//! Default HTTP transport
//!
//! Issues a single GET per page and hands back the decoded body:
//! - Sends the cursor's headers and query string
//! - Classifies non-2xx responses as transport errors
//! - Undoes gzip/deflate content encoding
//! - Parses the body as JSON
//!
//! No retries, no rate limiting. Those belong to a wrapping transport.

use super::encoding::{decode_content, parse_body};
use super::types::{PageRequest, PageResult, ResponseMeta, Transport};
use crate::error::{Error, Result};
use crate::types::StringMap;
use async_trait::async_trait;
use reqwest::header::CONTENT_ENCODING;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Configuration for the HTTP transport
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Headers sent with every request (cursor headers win on conflict)
    pub default_headers: StringMap,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            default_headers: StringMap::new(),
            user_agent: format!("rest-collection/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpTransportConfig {
    /// Create a new config builder
    pub fn builder() -> HttpTransportConfigBuilder {
        HttpTransportConfigBuilder::default()
    }
}

/// Builder for HTTP transport config
#[derive(Default)]
pub struct HttpTransportConfigBuilder {
    config: HttpTransportConfig,
}

impl HttpTransportConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpTransportConfig {
        self.config
    }
}

/// reqwest-backed [`Transport`]
pub struct HttpTransport {
    client: Client,
    config: HttpTransportConfig,
}

impl HttpTransport {
    /// Create a transport with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpTransportConfig::default())
    }

    /// Create a transport with custom configuration
    pub fn with_config(config: HttpTransportConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a transport around an existing reqwest client
    pub fn with_client(client: Client, config: HttpTransportConfig) -> Self {
        Self { client, config }
    }

    /// Get the transport configuration
    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, request: PageRequest) -> Result<PageResult> {
        debug!(
            "GET {} (page {})",
            request.url.as_str(),
            request.page_index
        );

        let mut req = self
            .client
            .get(request.url.clone())
            .timeout(self.config.timeout);

        for (key, value) in &self.config.default_headers {
            if request.header(key).is_none() {
                req = req.header(key.as_str(), value.as_str());
            }
        }
        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let response = req.send().await?;
        let status = response.status();
        let headers = response.headers().clone();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let raw = response.bytes().await?;
        let encoding = headers
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok());
        let decoded = decode_content(&raw, encoding)?;
        let body = parse_body(&decoded, request.json)?;

        debug!(
            "Received {} ({} bytes, {} decoded)",
            status.as_u16(),
            raw.len(),
            decoded.len()
        );

        Ok(PageResult::new(
            ResponseMeta::new(status.as_u16(), headers),
            body,
        ))
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
