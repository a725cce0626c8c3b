//! Next-page resolver implementations

use super::types::{NextPage, NextPageResolver, RequestState};
use crate::extract::{DataExtractor, EnvelopeExtractor};
use crate::http::{PageResult, ResponseMeta};
use crate::types::{is_truthy, JsonValue};
use reqwest::header::LINK;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Query parameter that receives an AWS-style `NextMarker`
pub const DEFAULT_MARKER_PARAM: &str = "Marker";

/// One `<url>; params` entry of a Link header
static LINK_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([^>]*)>([^<]*)").expect("valid link header regex"));

// ============================================================================
// Heuristic Resolver
// ============================================================================

/// Default resolver
///
/// Tries, in order, and returns the first hit:
/// 1. `Link` response header with `rel="next"`
/// 2. Body fields `paging.next`, `meta.next`, `nextLink`, `__next`,
///    `@odata.nextLink`, then `NextMarker` (as a query parameter)
/// 3. A numeric `page` query parameter: next page if the current page had
///    records, done otherwise
/// 4. Done
#[derive(Clone)]
pub struct HeuristicResolver {
    extractor: Arc<dyn DataExtractor>,
    marker_param: String,
}

impl Default for HeuristicResolver {
    fn default() -> Self {
        Self::new(Arc::new(EnvelopeExtractor::new()))
    }
}

impl HeuristicResolver {
    /// Create a resolver that counts records with `extractor`
    ///
    /// The extractor is only consulted by the `page` query string rule.
    pub fn new(extractor: Arc<dyn DataExtractor>) -> Self {
        Self {
            extractor,
            marker_param: DEFAULT_MARKER_PARAM.to_string(),
        }
    }

    /// Set the query parameter used for `NextMarker`
    #[must_use]
    pub fn with_marker_param(mut self, param: impl Into<String>) -> Self {
        self.marker_param = param.into();
        self
    }

    /// The query parameter used for `NextMarker`
    pub fn marker_param(&self) -> &str {
        &self.marker_param
    }

    /// Look for a `rel="next"` entry in the Link header
    pub fn from_link_header(&self, meta: &ResponseMeta) -> Option<NextPage> {
        meta.headers
            .get_all(LINK)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(parse_next_link)
            .map(NextPage::with_url)
    }

    /// Look for a next link in well-known body fields
    pub fn from_envelope(&self, body: &JsonValue) -> Option<NextPage> {
        let envelope = body.as_object()?;

        nested_str(body, "paging", "next")
            .or_else(|| nested_str(body, "meta", "next"))
            // Google APIs
            .or_else(|| non_empty_str(envelope.get("nextLink")))
            // OData v2/v3
            .or_else(|| non_empty_str(envelope.get("__next")))
            .map(NextPage::with_url)
            // OData v4
            .or_else(|| {
                envelope
                    .get("@odata.nextLink")
                    .filter(|v| is_truthy(v))
                    .map(odata_next)
            })
            // AWS
            .or_else(|| {
                non_empty_str(envelope.get("NextMarker"))
                    .map(|marker| NextPage::with_param(&self.marker_param, marker))
            })
    }

    /// Advance a numeric `page` query parameter while pages have records
    pub fn from_query_string(&self, page: &PageResult, state: &RequestState) -> Option<NextPage> {
        let current = state.page_number()?;

        let has_records = self
            .extractor
            .extract(page)
            .is_some_and(|records| !records.is_empty());

        if !has_records {
            return Some(NextPage::Done);
        }
        // No page after i64::MAX
        Some(
            current
                .checked_add(1)
                .map_or(NextPage::Done, |next| NextPage::with_param("page", next)),
        )
    }
}

impl NextPageResolver for HeuristicResolver {
    fn resolve(&self, page: &PageResult, state: &RequestState) -> NextPage {
        self.from_link_header(&page.meta)
            .or_else(|| self.from_envelope(&page.body))
            .or_else(|| self.from_query_string(page, state))
            .unwrap_or(NextPage::Done)
    }
}

impl fmt::Debug for HeuristicResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeuristicResolver")
            .field("marker_param", &self.marker_param)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Parse a Link header and extract the URL whose rel includes `next`
///
/// Format: `<url>; rel="next", <url>; rel="prev"`. Quotes may be single,
/// double or absent and the `rel` name is matched without regard to case.
pub fn parse_next_link(header: &str) -> Option<String> {
    for entry in LINK_ENTRY.captures_iter(header) {
        let url = entry.get(1).map_or("", |m| m.as_str()).trim();
        let params = entry.get(2).map_or("", |m| m.as_str());

        let is_next = params.split(';').any(|param| {
            let Some((name, value)) = param.split_once('=') else {
                return false;
            };
            name.trim().eq_ignore_ascii_case("rel")
                && value
                    .trim()
                    .trim_end_matches(',')
                    .trim()
                    .trim_matches(|c| c == '"' || c == '\'')
                    .split_whitespace()
                    .any(|rel| rel.eq_ignore_ascii_case("next"))
        });

        if is_next && !url.is_empty() {
            return Some(url.to_string());
        }
    }

    None
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn nested_str(body: &Value, outer: &str, inner: &str) -> Option<String> {
    non_empty_str(body.get(outer).and_then(|o| o.get(inner)))
}

fn odata_next(value: &Value) -> NextPage {
    match value {
        Value::String(url) => NextPage::with_url(url.clone()),
        Value::Object(params) => NextPage::with_params(params.clone()),
        other => NextPage::with_url(other.to_string()),
    }
}
