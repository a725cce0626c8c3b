//! Pagination engine module
//!
//! Sequences fetch, extract and resolve for one paginated collection.
//!
//! # Overview
//!
//! The engine module provides:
//! - `PaginationEngine` - Fetches exactly one page per call to `next_page`
//! - `PageOutcome` - The records and diagnostic event of one page
//! - `Phase` - Fetch cycle state (Idle, Fetching, Emitting, ResolvingNext, Terminated)
//!
//! Taking `&mut self` in `next_page` is what keeps a single fetch in flight:
//! the resolver of page *n* has updated the cursor before page *n+1* starts.

mod types;

pub use types::{EngineStats, PageEvent, PageOutcome, Phase};

use crate::config::PaginateConfig;
use crate::error::{Error, Result};
use crate::extract::DataExtractor;
use crate::http::Transport;
use crate::pagination::{NextPageResolver, RequestState};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Pull-driven pagination state machine
pub struct PaginationEngine {
    /// Fetches pages
    transport: Arc<dyn Transport>,
    /// Finds records in a page
    extractor: Arc<dyn DataExtractor>,
    /// Finds the next page
    resolver: Arc<dyn NextPageResolver>,
    /// Parse bodies as JSON
    json: bool,
    /// Request cursor
    state: RequestState,
    /// Current phase
    phase: Phase,
    /// Resolution failure reported on the pull after its records
    pending_error: Option<Error>,
    /// Statistics
    stats: EngineStats,
}

impl PaginationEngine {
    /// Create an engine from validated options
    pub fn new(config: PaginateConfig) -> Self {
        Self::from_parts(
            config.initial_state(),
            config.transport(),
            config.extractor(),
            config.resolver(),
        )
        .with_json(config.json())
    }

    /// Create an engine from its collaborators
    pub fn from_parts(
        state: RequestState,
        transport: Arc<dyn Transport>,
        extractor: Arc<dyn DataExtractor>,
        resolver: Arc<dyn NextPageResolver>,
    ) -> Self {
        Self {
            transport,
            extractor,
            resolver,
            json: true,
            state,
            phase: Phase::Idle,
            pending_error: None,
            stats: EngineStats::default(),
        }
    }

    /// Set whether bodies are parsed as JSON
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Get the request cursor
    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Get the current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Get statistics
    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Check if no further fetches will happen
    pub fn is_terminated(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Stop the sequence; later pulls return `Ok(None)`
    pub fn terminate(&mut self) {
        if !self.phase.is_terminal() {
            debug!("Sequence terminated after {} pages", self.stats.pages_fetched);
        }
        self.phase = Phase::Terminated;
        self.state.uri = None;
        self.pending_error = None;
    }

    /// Fetch, extract and resolve exactly one page
    ///
    /// - `Ok(Some(_))`: one page fetched; its records are final
    /// - `Ok(None)`: the collection is exhausted (repeatable)
    /// - `Err(_)`: the sequence failed and is now terminated
    ///
    /// A failure while applying the next-page descriptor is held back and
    /// returned by the following call, so the current page's records are
    /// still delivered.
    pub async fn next_page(&mut self) -> Result<Option<PageOutcome>> {
        if let Some(err) = self.pending_error.take() {
            self.terminate();
            return Err(err);
        }
        if self.phase.is_terminal() {
            return Ok(None);
        }

        let Some(request) = self.state.to_request(self.json) else {
            info!(
                "Collection exhausted: {} records in {} pages",
                self.stats.records_extracted, self.stats.pages_fetched
            );
            self.terminate();
            return Ok(None);
        };

        self.phase = Phase::Fetching;
        debug!(
            "Fetching page {} from {}",
            self.state.page_index,
            request.url.as_str()
        );

        let page = match self.transport.fetch(request).await {
            Ok(page) => Arc::new(page),
            Err(e) => {
                warn!("Page {} failed: {e}", self.state.page_index);
                self.terminate();
                return Err(e);
            }
        };

        self.phase = Phase::Emitting;
        let event = PageEvent::new(self.state.clone(), Arc::clone(&page));
        let (records, recognized) = match self.extractor.extract(&page) {
            Some(records) => (records, true),
            None => {
                warn!(
                    "Page {}: no record collection recognized in response body",
                    self.state.page_index
                );
                (Vec::new(), false)
            }
        };
        self.stats.add_page(records.len(), recognized);

        self.phase = Phase::ResolvingNext;
        let next = self.resolver.resolve(&page, &self.state);
        debug!("Page {}: {} records, next {next:?}", self.state.page_index, records.len());
        if let Err(e) = self.state.apply(next) {
            warn!("Cannot follow next page: {e}");
            self.state.uri = None;
            self.pending_error = Some(e);
        }
        self.state.page_index += 1;
        self.phase = Phase::Idle;

        Ok(Some(PageOutcome {
            event,
            records,
            recognized,
        }))
    }
}

impl std::fmt::Debug for PaginationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationEngine")
            .field("state", &self.state)
            .field("phase", &self.phase)
            .field("json", &self.json)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
