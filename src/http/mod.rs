//! HTTP transport module
//!
//! The engine only knows the [`Transport`] trait. This module provides the
//! default reqwest-backed implementation and the body decoding it uses.
//!
//! # Features
//!
//! - **Pluggable**: any `Transport`, or an async closure via [`transport_fn`]
//! - **Content-Encoding**: transparent gzip and deflate decoding
//! - **Structured bodies**: JSON parsing, or raw text when JSON is disabled

mod encoding;
mod transport;
mod types;

pub use encoding::{decode_content, parse_body};
pub use transport::{HttpTransport, HttpTransportConfig, HttpTransportConfigBuilder};
pub use types::{transport_fn, FnTransport, PageRequest, PageResult, ResponseMeta, Transport};
