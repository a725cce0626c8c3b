//! Extractor trait
//!
//! Defines the strategy interface shared by all extractors.

use crate::http::PageResult;
use crate::types::Record;

/// Pulls the records out of a fetched page
///
/// Returns `None` when the body shape is not recognized. That is not an
/// error: the page contributes no records and pagination carries on.
///
/// Any `Fn(&PageResult) -> Option<Vec<Record>>` closure is an extractor.
pub trait DataExtractor: Send + Sync {
    /// Extract the records of `page`, in document order
    fn extract(&self, page: &PageResult) -> Option<Vec<Record>>;
}

impl<F> DataExtractor for F
where
    F: Fn(&PageResult) -> Option<Vec<Record>> + Send + Sync,
{
    fn extract(&self, page: &PageResult) -> Option<Vec<Record>> {
        self(page)
    }
}
