//! Stream module
//!
//! Exposes a paginated collection as a lazy `futures::Stream`.
//!
//! # Overview
//!
//! The stream module provides:
//! - `Sequence` - Pull-based stream of page and record events
//! - `SequenceEvent` - `Page` diagnostics and `Data` records
//! - `SequenceControl` - Pause, resume and cancel from any task
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::StreamExt;
//!
//! let mut records = rest_collection::paginate_url("https://api.example.com/items")?.records();
//! while let Some(record) = records.next().await {
//!     println!("{}", record?);
//! }
//! ```

mod sequence;
mod types;

pub use sequence::Sequence;
pub use types::{SequenceControl, SequenceEvent};
