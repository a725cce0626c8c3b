//! Record extraction module
//!
//! Locates the record collection inside a page body.
//!
//! # Overview
//!
//! A [`DataExtractor`] turns one page into zero or more records, or reports
//! that it does not recognize the body. The default [`EnvelopeExtractor`]
//! accepts bare arrays and the common envelope keys; [`PathExtractor`]
//! follows an explicit path for APIs with unusual shapes.

mod extractors;
mod types;

pub use extractors::{EnvelopeExtractor, PathExtractor, CONTAINER_KEYS};
pub use types::DataExtractor;
