//! Pagination options
//!
//! [`PaginateOptions`] is the loose, caller-facing overlay. [`PaginateOptions::build`]
//! validates it once into an immutable [`PaginateConfig`].

use crate::error::{Error, Result};
use crate::extract::{DataExtractor, EnvelopeExtractor, PathExtractor};
use crate::http::{HttpTransport, HttpTransportConfig, Transport};
use crate::pagination::{HeuristicResolver, NextPageResolver, RequestState, DEFAULT_MARKER_PARAM};
use crate::types::{is_scalar, JsonValue, QueryParams, StringMap};
use std::fmt;
use std::sync::Arc;
use tracing::warn;
use url::Url;

/// Default `Accept` header
pub const DEFAULT_ACCEPT: &str = "application/json";

/// Default `Accept-Encoding` header
pub const DEFAULT_ACCEPT_ENCODING: &str = "gzip, deflate";

// ============================================================================
// Options
// ============================================================================

/// Caller-supplied options; every field is optional
#[derive(Clone, Default)]
pub struct PaginateOptions {
    /// First page URI
    pub uri: Option<String>,
    /// Initial query parameters (scalars only)
    pub query_params: QueryParams,
    /// Request headers
    pub headers: StringMap,
    /// Parse bodies as JSON (default: true)
    pub json: Option<bool>,
    /// Read records from this path instead of the envelope heuristic
    pub records_path: Option<String>,
    /// Query parameter receiving `NextMarker` (default: `Marker`)
    pub marker_param: Option<String>,
    /// Custom record extractor
    pub data: Option<Arc<dyn DataExtractor>>,
    /// Custom next-page resolver
    pub next: Option<Arc<dyn NextPageResolver>>,
    /// Custom transport
    pub transport: Option<Arc<dyn Transport>>,
    /// Settings for the default HTTP transport
    pub http: Option<HttpTransportConfig>,
}

impl PaginateOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first page URI
    #[must_use]
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set whether bodies are parsed as JSON
    #[must_use]
    pub fn json(mut self, json: bool) -> Self {
        self.json = Some(json);
        self
    }

    /// Read records from a fixed path, e.g. `response.items`
    #[must_use]
    pub fn records_path(mut self, path: impl Into<String>) -> Self {
        self.records_path = Some(path.into());
        self
    }

    /// Set the query parameter that receives `NextMarker`
    #[must_use]
    pub fn marker_param(mut self, param: impl Into<String>) -> Self {
        self.marker_param = Some(param.into());
        self
    }

    /// Replace the record extractor
    #[must_use]
    pub fn data(mut self, extractor: impl DataExtractor + 'static) -> Self {
        self.data = Some(Arc::new(extractor));
        self
    }

    /// Replace the next-page resolver
    #[must_use]
    pub fn next(mut self, resolver: impl NextPageResolver + 'static) -> Self {
        self.next = Some(Arc::new(resolver));
        self
    }

    /// Replace the transport
    #[must_use]
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Configure the default HTTP transport
    #[must_use]
    pub fn http_config(mut self, config: HttpTransportConfig) -> Self {
        self.http = Some(config);
        self
    }

    /// Overlay `other` on top of these options; set fields in `other` win
    #[must_use]
    pub fn merge(mut self, other: PaginateOptions) -> Self {
        self.query_params.extend(other.query_params);
        self.headers.extend(other.headers);
        Self {
            uri: other.uri.or(self.uri),
            query_params: self.query_params,
            headers: self.headers,
            json: other.json.or(self.json),
            records_path: other.records_path.or(self.records_path),
            marker_param: other.marker_param.or(self.marker_param),
            data: other.data.or(self.data),
            next: other.next.or(self.next),
            transport: other.transport.or(self.transport),
            http: other.http.or(self.http),
        }
    }

    /// Validate and freeze the options
    pub fn build(self) -> Result<PaginateConfig> {
        let uri = self
            .uri
            .as_deref()
            .map(|uri| Url::parse(uri).map_err(|e| Error::invalid_value("uri", e.to_string())))
            .transpose()?;

        for (key, value) in &self.query_params {
            if !is_scalar(value) {
                return Err(Error::invalid_value(
                    format!("query_params.{key}"),
                    format!("expected a string, number or boolean, got {value}"),
                ));
            }
        }

        let mut headers = self.headers;
        default_header(&mut headers, "Accept", DEFAULT_ACCEPT);
        default_header(&mut headers, "Accept-Encoding", DEFAULT_ACCEPT_ENCODING);

        let extractor: Arc<dyn DataExtractor> = match (self.data, self.records_path) {
            (Some(data), path) => {
                if path.is_some() {
                    warn!("Both a custom extractor and records_path given; using the extractor");
                }
                data
            }
            (None, Some(path)) => Arc::new(PathExtractor::new(path)),
            (None, None) => Arc::new(EnvelopeExtractor::new()),
        };

        let resolver: Arc<dyn NextPageResolver> = match self.next {
            Some(next) => next,
            None => Arc::new(
                HeuristicResolver::new(Arc::clone(&extractor)).with_marker_param(
                    self.marker_param
                        .unwrap_or_else(|| DEFAULT_MARKER_PARAM.to_string()),
                ),
            ),
        };

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::with_config(self.http.unwrap_or_default())?),
        };

        Ok(PaginateConfig {
            uri,
            query_params: self.query_params,
            headers,
            json: self.json.unwrap_or(true),
            extractor,
            resolver,
            transport,
        })
    }
}

impl fmt::Debug for PaginateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginateOptions")
            .field("uri", &self.uri)
            .field("query_params", &self.query_params)
            .field("headers", &self.headers)
            .field("json", &self.json)
            .field("records_path", &self.records_path)
            .field("marker_param", &self.marker_param)
            .field("has_data", &self.data.is_some())
            .field("has_next", &self.next.is_some())
            .field("has_transport", &self.transport.is_some())
            .finish_non_exhaustive()
    }
}

fn default_header(headers: &mut StringMap, name: &str, value: &str) {
    if !headers.keys().any(|key| key.eq_ignore_ascii_case(name)) {
        headers.insert(name.to_string(), value.to_string());
    }
}

// ============================================================================
// Target
// ============================================================================

/// What to paginate: a URI, or a full set of options
#[derive(Debug, Clone)]
pub enum Target {
    /// First page URI
    Uri(String),
    /// Options carrying their own URI
    Options(PaginateOptions),
}

impl From<&str> for Target {
    fn from(uri: &str) -> Self {
        Self::Uri(uri.to_string())
    }
}

impl From<String> for Target {
    fn from(uri: String) -> Self {
        Self::Uri(uri)
    }
}

impl From<Url> for Target {
    fn from(uri: Url) -> Self {
        Self::Uri(uri.into())
    }
}

impl From<PaginateOptions> for Target {
    fn from(options: PaginateOptions) -> Self {
        Self::Options(options)
    }
}

impl Target {
    /// Combine with caller options; an explicit `uri` in `options` wins
    pub fn into_options(self, options: PaginateOptions) -> PaginateOptions {
        match self {
            Target::Uri(uri) => PaginateOptions::new().uri(uri).merge(options),
            Target::Options(base) => base.merge(options),
        }
    }
}

// ============================================================================
// Config
// ============================================================================

/// Validated, immutable configuration for one sequence
#[derive(Clone)]
pub struct PaginateConfig {
    uri: Option<Url>,
    query_params: QueryParams,
    headers: StringMap,
    json: bool,
    extractor: Arc<dyn DataExtractor>,
    resolver: Arc<dyn NextPageResolver>,
    transport: Arc<dyn Transport>,
}

impl PaginateConfig {
    /// First page URI
    pub fn uri(&self) -> Option<&Url> {
        self.uri.as_ref()
    }

    /// Initial query parameters
    pub fn query_params(&self) -> &QueryParams {
        &self.query_params
    }

    /// Request headers, defaults included
    pub fn headers(&self) -> &StringMap {
        &self.headers
    }

    /// Whether bodies are parsed as JSON
    pub fn json(&self) -> bool {
        self.json
    }

    /// Record extractor
    pub fn extractor(&self) -> Arc<dyn DataExtractor> {
        Arc::clone(&self.extractor)
    }

    /// Next-page resolver
    pub fn resolver(&self) -> Arc<dyn NextPageResolver> {
        Arc::clone(&self.resolver)
    }

    /// Transport
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// A fresh cursor for a new sequence
    pub fn initial_state(&self) -> RequestState {
        RequestState::new(self.uri.clone())
            .with_query_params(self.query_params.clone())
            .with_headers(self.headers.clone())
    }
}

impl fmt::Debug for PaginateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginateConfig")
            .field("uri", &self.uri.as_ref().map(Url::as_str))
            .field("query_params", &self.query_params)
            .field("headers", &self.headers)
            .field("json", &self.json)
            .finish_non_exhaustive()
    }
}
