//! Extractor implementations

use super::types::DataExtractor;
use crate::http::PageResult;
use crate::types::{JsonValue, Record};
use serde_json::Value;

/// Envelope keys checked by [`EnvelopeExtractor`], highest priority first
pub const CONTAINER_KEYS: [&str; 5] = ["data", "results", "items", "value", "objects"];

// ============================================================================
// Envelope Extractor
// ============================================================================

/// Default extractor
///
/// 1. A body that is an array is returned verbatim.
/// 2. An object body is searched for [`CONTAINER_KEYS`] in order; the first
///    key whose value is an array wins.
/// 3. Anything else is unrecognized.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeExtractor;

impl EnvelopeExtractor {
    /// Create the default extractor
    pub fn new() -> Self {
        Self
    }
}

impl DataExtractor for EnvelopeExtractor {
    fn extract(&self, page: &PageResult) -> Option<Vec<Record>> {
        match &page.body {
            Value::Array(records) => Some(records.clone()),
            Value::Object(envelope) => CONTAINER_KEYS.iter().find_map(|key| {
                envelope.get(*key).and_then(Value::as_array).cloned()
            }),
            _ => None,
        }
    }
}

// ============================================================================
// Path Extractor
// ============================================================================

/// Extractor that follows a fixed path into the body
///
/// Paths use dot notation with optional array indices, e.g.
/// `very.unusual[0].data` or `$.response.rows`. Negative indices count from
/// the end. An array at the path yields its elements, any other value yields
/// a single record, and a missing path is unrecognized.
#[derive(Debug, Clone)]
pub struct PathExtractor {
    path: String,
}

impl PathExtractor {
    /// Create an extractor for `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// The configured path
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl DataExtractor for PathExtractor {
    fn extract(&self, page: &PageResult) -> Option<Vec<Record>> {
        match lookup_path(&page.body, &self.path)? {
            Value::Array(records) => Some(records.clone()),
            Value::Null => None,
            value => Some(vec![value.clone()]),
        }
    }
}

/// Walk a dot/bracket path through a JSON value
pub(crate) fn lookup_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let path = path.strip_prefix('$').unwrap_or(path);

    let mut current = value;
    for part in path.split('.').filter(|p| !p.is_empty()) {
        // "name[0][1]" -> field "name", then each index in turn
        let (name, mut indices) = match part.find('[') {
            Some(pos) => (&part[..pos], &part[pos..]),
            None => (part, ""),
        };

        if !name.is_empty() {
            current = current.get(name)?;
        }

        while let Some(rest) = indices.strip_prefix('[') {
            let end = rest.find(']')?;
            let index: i64 = rest[..end].trim().parse().ok()?;
            let arr = current.as_array()?;

            #[allow(clippy::cast_possible_wrap)]
            let idx = if index < 0 {
                arr.len() as i64 + index
            } else {
                index
            };
            current = arr.get(usize::try_from(idx).ok()?)?;
            indices = &rest[end + 1..];
        }

        if !indices.is_empty() {
            return None;
        }
    }

    Some(current)
}
