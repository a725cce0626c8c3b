//! Pagination types and traits
//!
//! Defines the request cursor, the next-page descriptor and the resolver
//! strategy interface.

use crate::error::{Error, Result};
use crate::http::{PageRequest, PageResult};
use crate::types::{is_scalar, scalar_to_string, QueryParams, StringMap};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use url::Url;

static ABSOLUTE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?:").expect("valid absolute url regex"));

/// Instruction for building the next request
#[derive(Debug, Clone, PartialEq)]
pub enum NextPage {
    /// No more pages
    Done,
    /// Merge these query parameters into the cursor, keep the URI
    Query(QueryParams),
    /// Replace the URI with this absolute URL
    Absolute(String),
    /// Resolve this reference against the current URI
    Relative(String),
}

impl NextPage {
    /// Create a continuation with query parameters
    pub fn with_params(params: QueryParams) -> Self {
        Self::Query(params)
    }

    /// Create a continuation with a single query parameter
    pub fn with_param(key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut params = QueryParams::new();
        params.insert(key.into(), value.into());
        Self::Query(params)
    }

    /// Create a continuation with a link, classified as absolute or relative
    pub fn with_url(url: impl Into<String>) -> Self {
        let url = url.into();
        if ABSOLUTE_URL.is_match(&url) {
            Self::Absolute(url)
        } else {
            Self::Relative(url)
        }
    }

    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        !self.is_done()
    }
}

/// Mutable request cursor for one sequence
///
/// Owned by the engine. Extractors and resolvers only read it.
#[derive(Debug, Clone, Default)]
pub struct RequestState {
    /// Next URI to fetch; `None` once the sequence is finished
    pub uri: Option<Url>,
    /// Query parameters merged into the URI on every request
    pub query_params: QueryParams,
    /// Request headers
    pub headers: StringMap,
    /// Number of completed fetches
    pub page_index: u64,
}

impl RequestState {
    /// Create a cursor starting at `uri`
    pub fn new(uri: Option<Url>) -> Self {
        Self {
            uri,
            ..Default::default()
        }
    }

    /// Set the query parameters
    #[must_use]
    pub fn with_query_params(mut self, params: QueryParams) -> Self {
        self.query_params = params;
        self
    }

    /// Set the headers
    #[must_use]
    pub fn with_headers(mut self, headers: StringMap) -> Self {
        self.headers = headers;
        self
    }

    /// Check if no further fetch may happen
    pub fn is_terminated(&self) -> bool {
        self.uri.is_none()
    }

    /// The `page` query parameter, when it is an integer
    pub fn page_number(&self) -> Option<i64> {
        self.query_params.get("page").and_then(Value::as_i64)
    }

    /// Apply a resolver's descriptor
    ///
    /// A new URI (absolute or relative) keeps the stored query parameters it
    /// does not set itself; the ones it does set are dropped.
    pub fn apply(&mut self, next: NextPage) -> Result<()> {
        match next {
            NextPage::Done => {
                self.uri = None;
            }
            NextPage::Query(params) => {
                if let Some((key, _)) = params.iter().find(|(_, v)| !is_scalar(v)) {
                    return Err(Error::invalid_value(
                        format!("next.{key}"),
                        "query parameter patches must hold scalar values",
                    ));
                }
                self.query_params.extend(params);
            }
            NextPage::Absolute(url) => {
                let uri = Url::parse(&url)?;
                self.replace_uri(uri);
            }
            NextPage::Relative(reference) => {
                let base = self
                    .uri
                    .as_ref()
                    .ok_or_else(|| Error::config("Cannot resolve a relative link without a URI"))?;
                let uri = base.join(&reference)?;
                self.replace_uri(uri);
            }
        }
        Ok(())
    }

    fn replace_uri(&mut self, uri: Url) {
        self.query_params
            .retain(|key, _| !uri.query_pairs().any(|(k, _)| k == key.as_str()));
        self.uri = Some(uri);
    }

    /// Build the request for the current cursor, `None` when terminated
    ///
    /// Query parameters replace same-named pairs already present in the URI.
    pub fn to_request(&self, json: bool) -> Option<PageRequest> {
        let mut url = self.uri.clone()?;

        if !self.query_params.is_empty() {
            let kept: Vec<(String, String)> = url
                .query_pairs()
                .filter(|(key, _)| !self.query_params.contains_key(&**key))
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect();

            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            pairs.extend_pairs(kept);
            for (key, value) in &self.query_params {
                if let Some(value) = scalar_to_string(value) {
                    pairs.append_pair(key, &value);
                }
            }
        }

        Some(PageRequest {
            url,
            headers: self.headers.clone(),
            json,
            page_index: self.page_index,
        })
    }
}

/// Decides how to reach the page after `page`
///
/// Any `Fn(&PageResult, &RequestState) -> NextPage` closure is a resolver.
pub trait NextPageResolver: Send + Sync {
    /// Inspect the page just fetched and describe the next request
    fn resolve(&self, page: &PageResult, state: &RequestState) -> NextPage;
}

impl<F> NextPageResolver for F
where
    F: Fn(&PageResult, &RequestState) -> NextPage + Send + Sync,
{
    fn resolve(&self, page: &PageResult, state: &RequestState) -> NextPage {
        self(page, state)
    }
}
