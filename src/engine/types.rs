//! Engine types
//!
//! Phase tracking, page observations and statistics for the engine.

use crate::http::{PageResult, ResponseMeta};
use crate::pagination::RequestState;
use crate::types::{JsonValue, Record};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Where the engine is in its fetch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for demand
    Idle,
    /// A transport fetch is outstanding
    Fetching,
    /// Extracting records from the fetched page
    Emitting,
    /// Running the next-page resolver
    ResolvingNext,
    /// Exhausted, failed or cancelled; no further fetches
    Terminated,
}

impl Phase {
    /// Check if no further fetches will happen
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }
}

/// Diagnostic observation of one fetched page
///
/// Carries the cursor used for the request together with the raw response,
/// so callers can see why a heuristic did or did not match.
#[derive(Debug, Clone)]
pub struct PageEvent {
    /// Cursor as it was when the page was requested
    pub state: RequestState,
    /// The response, shared with the engine
    pub page: Arc<PageResult>,
    /// When the response arrived
    pub fetched_at: DateTime<Utc>,
}

impl PageEvent {
    /// Create a page event
    pub fn new(state: RequestState, page: Arc<PageResult>) -> Self {
        Self {
            state,
            page,
            fetched_at: Utc::now(),
        }
    }

    /// Status and headers of the response
    pub fn meta(&self) -> &ResponseMeta {
        &self.page.meta
    }

    /// The parsed response body
    pub fn body(&self) -> &JsonValue {
        &self.page.body
    }

    /// Zero-based page index
    pub fn page_index(&self) -> u64 {
        self.state.page_index
    }
}

/// Everything one unit of demand produced
#[derive(Debug, Clone)]
pub struct PageOutcome {
    /// Observation of the fetched page
    pub event: PageEvent,
    /// Records in document order
    pub records: Vec<Record>,
    /// False when the extractor did not recognize the body
    pub recognized: bool,
}

/// Statistics for one sequence
#[derive(Debug, Clone, Default)]
pub struct EngineStats {
    /// Completed fetches
    pub pages_fetched: u64,
    /// Records handed to the consumer
    pub records_extracted: u64,
    /// Pages whose body shape was not recognized
    pub unrecognized_pages: u64,
}

impl EngineStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed page
    pub fn add_page(&mut self, records: usize, recognized: bool) {
        self.pages_fetched += 1;
        self.records_extracted += records as u64;
        if !recognized {
            self.unrecognized_pages += 1;
        }
    }
}
