// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # rest-collection
//!
//! Stream every record of a paginated REST collection as one lazy sequence.
//!
//! ## Features
//!
//! - **Record Heuristics**: Finds the record array in bare arrays and
//!   `data`/`results`/`items`/`value`/`objects` envelopes
//! - **Next Page Heuristics**: Link headers, `paging.next`, `meta.next`,
//!   `nextLink`, `__next`, `@odata.nextLink`, `NextMarker`, `?page=N`
//! - **Lazy**: A page is fetched only when the consumer asks for more
//! - **Backpressure**: Pause, resume and cancel without losing records
//! - **Pluggable**: Custom extractors, resolvers and transports
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use rest_collection::{paginate, PaginateOptions};
//!
//! #[tokio::main]
//! async fn main() -> rest_collection::Result<()> {
//!     let options = PaginateOptions::new().query("per_page", 100);
//!     let mut records = paginate("https://api.github.com/repos/rust-lang/rust/issues", options)?
//!         .records();
//!
//!     while let Some(record) = records.next().await {
//!         println!("{}", record?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 Sequence (futures::Stream)                    │
//! │         Page / Data events, pause, resume, cancel             │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ demand
//! ┌──────────────────────────────┴───────────────────────────────┐
//! │                     PaginationEngine                          │
//! │      fetch  →  extract  →  emit  →  resolve next  →  idle     │
//! ├────────────────┬───────────────────┬─────────────────────────┤
//! │   Transport    │   DataExtractor   │    NextPageResolver     │
//! │ reqwest + gzip │ envelope / path   │ link / envelope / page  │
//! └────────────────┴───────────────────┴─────────────────────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Page transport and body decoding
pub mod http;

/// Record extraction
pub mod extract;

/// Request cursor and next-page resolution
pub mod pagination;

/// Fetch/extract/resolve state machine
pub mod engine;

/// Lazy stream adapter
pub mod stream;

/// Options and validation
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{PaginateConfig, PaginateOptions, Target};
pub use engine::{PageEvent, PaginationEngine};
pub use error::{Error, ErrorKind, Result};
pub use extract::{DataExtractor, EnvelopeExtractor, PathExtractor};
pub use http::{transport_fn, HttpTransport, PageRequest, PageResult, ResponseMeta, Transport};
pub use pagination::{HeuristicResolver, NextPage, NextPageResolver, RequestState};
pub use stream::{Sequence, SequenceControl, SequenceEvent};
pub use types::*;

/// Create a lazy sequence over every record of a collection
///
/// `options` overlay the target; an explicit `uri` in them wins. Nothing is
/// fetched until the returned sequence is polled.
pub fn paginate(target: impl Into<Target>, options: PaginateOptions) -> Result<Sequence> {
    let config = target.into().into_options(options).build()?;
    Ok(Sequence::new(PaginationEngine::new(config)))
}

/// Create a lazy sequence with default options
pub fn paginate_url(uri: impl Into<String>) -> Result<Sequence> {
    paginate(Target::Uri(uri.into()), PaginateOptions::new())
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
