//! Content-Encoding and body parsing
//!
//! Independent of the engine: the default transport runs raw bytes through
//! [`decode_content`] and then [`parse_body`].

use crate::error::{Error, Result};
use crate::types::JsonValue;
use flate2::read::{DeflateDecoder, MultiGzDecoder, ZlibDecoder};
use std::borrow::Cow;
use std::io::Read;

/// Undo a `Content-Encoding` applied by the server
///
/// Supports `gzip` (and `x-gzip`) and `deflate`. HTTP `deflate` is meant to
/// be a zlib stream but some servers send raw deflate, so both are accepted.
/// Missing or `identity` encodings return the input untouched.
pub fn decode_content<'a>(raw: &'a [u8], encoding: Option<&str>) -> Result<Cow<'a, [u8]>> {
    let encoding = encoding.map(|e| e.trim().to_ascii_lowercase());

    match encoding.as_deref() {
        None | Some("" | "identity") => Ok(Cow::Borrowed(raw)),
        Some("gzip" | "x-gzip") => {
            let mut out = Vec::new();
            MultiGzDecoder::new(raw)
                .read_to_end(&mut out)
                .map_err(|e| Error::decode(format!("Invalid gzip payload: {e}")))?;
            Ok(Cow::Owned(out))
        }
        Some("deflate") => {
            let mut out = Vec::new();
            if ZlibDecoder::new(raw).read_to_end(&mut out).is_ok() {
                return Ok(Cow::Owned(out));
            }

            out.clear();
            DeflateDecoder::new(raw)
                .read_to_end(&mut out)
                .map_err(|e| Error::decode(format!("Invalid deflate payload: {e}")))?;
            Ok(Cow::Owned(out))
        }
        Some(other) => Err(Error::decode(format!(
            "Unsupported content encoding: {other}"
        ))),
    }
}

/// Parse a decoded body
///
/// With `json` set the body must be JSON; an empty body becomes `null`.
/// Otherwise the body text is returned as a JSON string.
pub fn parse_body(bytes: &[u8], json: bool) -> Result<JsonValue> {
    if json {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonValue::Null);
        }
        return Ok(serde_json::from_slice(bytes)?);
    }

    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::decode(format!("Response body is not UTF-8: {e}")))?;
    Ok(JsonValue::String(text.to_string()))
}
