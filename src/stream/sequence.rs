//! Lazy record sequence
//!
//! Adapts the pull-driven engine to a `futures::Stream`. A fetch only starts
//! when the consumer polls, the buffer is empty and the sequence is not
//! paused.

use super::types::{SequenceControl, SequenceEvent};
use crate::engine::{EngineStats, PageOutcome, PaginationEngine};
use crate::error::{Error, Result};
use crate::types::Record;
use futures::future::{self, BoxFuture};
use futures::{FutureExt, Stream, StreamExt, TryStreamExt};
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::debug;

type Fetch = BoxFuture<'static, (PaginationEngine, Result<Option<PageOutcome>>)>;

/// Every record of a paginated collection, fetched on demand
///
/// Yields one [`SequenceEvent::Page`] per fetched page followed by its
/// [`SequenceEvent::Data`] records. An `Err` item is always the last item.
pub struct Sequence {
    /// Engine, absent while a fetch owns it
    engine: Option<PaginationEngine>,
    /// The single outstanding fetch
    in_flight: Option<Fetch>,
    /// Events fetched but not yet delivered
    buffer: VecDeque<SequenceEvent>,
    /// Failure to deliver once the buffer is drained
    failure: Option<Error>,
    /// No further fetches
    finished: bool,
    /// Statistics as of the last completed fetch
    stats: EngineStats,
    /// Pause, resume and cancel
    control: SequenceControl,
}

impl Sequence {
    /// Wrap an engine; nothing is fetched until the first poll
    pub fn new(engine: PaginationEngine) -> Self {
        let stats = engine.stats().clone();
        Self {
            engine: Some(engine),
            in_flight: None,
            buffer: VecDeque::new(),
            failure: None,
            finished: false,
            stats,
            control: SequenceControl::new(),
        }
    }

    /// A handle that can pause, resume or cancel this sequence from elsewhere
    pub fn control(&self) -> SequenceControl {
        self.control.clone()
    }

    /// Stop starting new fetches; buffered events are held back
    pub fn pause(&self) {
        self.control.pause();
    }

    /// Resume delivery and fetching
    pub fn resume(&self) {
        self.control.resume();
    }

    /// Stop for good; the stream ends on the next poll
    pub fn cancel(&self) {
        self.control.cancel();
    }

    /// Check if the sequence is paused
    pub fn is_paused(&self) -> bool {
        self.control.is_paused()
    }

    /// Number of events waiting to be delivered
    pub fn pending_events(&self) -> usize {
        self.buffer.len()
    }

    /// Check if a fetch is outstanding
    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Statistics as of the last completed fetch
    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Only the records, in collection order
    pub fn records(self) -> impl Stream<Item = Result<Record>> + Send + Unpin {
        self.filter_map(|event| {
            future::ready(match event {
                Ok(SequenceEvent::Data(record)) => Some(Ok(record)),
                Ok(SequenceEvent::Page(_)) => None,
                Err(e) => Some(Err(e)),
            })
        })
    }

    /// Drain the whole collection
    pub async fn collect_records(self) -> Result<Vec<Record>> {
        self.records().try_collect().await
    }

    fn start_fetch(&mut self) -> bool {
        let Some(mut engine) = self.engine.take() else {
            return false;
        };
        self.in_flight = Some(
            async move {
                let result = engine.next_page().await;
                (engine, result)
            }
            .boxed(),
        );
        true
    }

    fn complete_fetch(&mut self, engine: PaginationEngine, result: Result<Option<PageOutcome>>) {
        self.stats = engine.stats().clone();
        self.engine = Some(engine);
        match result {
            Ok(Some(outcome)) => {
                self.buffer.push_back(SequenceEvent::Page(outcome.event));
                self.buffer
                    .extend(outcome.records.into_iter().map(SequenceEvent::Data));
            }
            Ok(None) => self.finished = true,
            Err(e) => {
                self.failure = Some(e);
                self.engine = None;
            }
        }
    }

    fn shutdown(&mut self) {
        if self.in_flight.take().is_some() {
            debug!("Cancelled with a fetch in flight");
        }
        self.engine = None;
        self.buffer.clear();
        self.failure = None;
        self.finished = true;
    }
}

impl Stream for Sequence {
    type Item = Result<SequenceEvent>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if this.control.is_cancelled() {
                this.shutdown();
                return Poll::Ready(None);
            }

            let paused = this.control.is_paused();
            if !paused {
                if let Some(event) = this.buffer.pop_front() {
                    return Poll::Ready(Some(Ok(event)));
                }
            }

            // An outstanding fetch keeps running while paused
            if let Some(fetch) = this.in_flight.as_mut() {
                match fetch.poll_unpin(cx) {
                    Poll::Ready((engine, result)) => {
                        this.in_flight = None;
                        this.complete_fetch(engine, result);
                        continue;
                    }
                    Poll::Pending => {
                        // Woken by the fetch, or by resume/cancel
                        this.control.register(cx.waker());
                        return Poll::Pending;
                    }
                }
            }

            if paused {
                this.control.register(cx.waker());
                if this.control.is_paused() && !this.control.is_cancelled() {
                    return Poll::Pending;
                }
                continue;
            }

            if let Some(err) = this.failure.take() {
                this.finished = true;
                return Poll::Ready(Some(Err(err)));
            }
            if this.finished || !this.start_fetch() {
                this.finished = true;
                return Poll::Ready(None);
            }
        }
    }
}

impl Drop for Sequence {
    fn drop(&mut self) {
        self.control.cancel();
    }
}

impl std::fmt::Debug for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequence")
            .field("pending_events", &self.buffer.len())
            .field("fetching", &self.in_flight.is_some())
            .field("finished", &self.finished)
            .field("control", &self.control)
            .finish_non_exhaustive()
    }
}
