//! Sequence types
//!
//! Events delivered to the consumer and the shared flow-control handle.

use crate::engine::PageEvent;
use crate::types::Record;
use futures::task::AtomicWaker;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::Waker;

/// One item of a [`Sequence`](super::Sequence)
#[derive(Debug, Clone)]
pub enum SequenceEvent {
    /// A page was fetched; precedes that page's records
    Page(PageEvent),
    /// One record
    Data(Record),
}

impl SequenceEvent {
    /// The record, if this is a data event
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Data(record) => Some(record),
            Self::Page(_) => None,
        }
    }

    /// The page event, if this is a page event
    pub fn as_page(&self) -> Option<&PageEvent> {
        match self {
            Self::Page(event) => Some(event),
            Self::Data(_) => None,
        }
    }

    /// Consume into the record, if this is a data event
    pub fn into_record(self) -> Option<Record> {
        match self {
            Self::Data(record) => Some(record),
            Self::Page(_) => None,
        }
    }
}

#[derive(Debug, Default)]
struct ControlState {
    paused: AtomicBool,
    cancelled: AtomicBool,
    waker: AtomicWaker,
}

/// Cloneable pause/resume/cancel handle
#[derive(Debug, Clone, Default)]
pub struct SequenceControl {
    inner: Arc<ControlState>,
}

impl SequenceControl {
    /// Create a new handle in the running state
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold back delivery and stop starting fetches
    pub fn pause(&self) {
        self.inner.paused.store(true, Ordering::SeqCst);
    }

    /// Resume delivery and fetching
    pub fn resume(&self) {
        self.inner.paused.store(false, Ordering::SeqCst);
        self.inner.waker.wake();
    }

    /// End the sequence; buffered events are discarded
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.waker.wake();
    }

    /// Check if paused
    pub fn is_paused(&self) -> bool {
        self.inner.paused.load(Ordering::SeqCst)
    }

    /// Check if cancelled
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    pub(crate) fn register(&self, waker: &Waker) {
        self.inner.waker.register(waker);
    }
}
