//! # Event Outbox
//!
//! Events are enqueued while the write that produced them still holds its
//! lock, and published by whoever flushes next under a single publish lock.
//!
//! ```text
//! write lock ─→ commit ─→ enqueue ─→ unlock
//!                                      │
//!                       flush (publish lock) ─→ EventPublisher
//! ```
//!
//! Enqueue order is commit order, and only one flush publishes at a time,
//! so subscribers see events in commit order. A flush that finds the queue
//! already drained returns once the earlier flush has finished, so every
//! caller's events are on the bus before its write call returns.

use parking_lot::Mutex;
use shared_bus::{DocumentEvent, EventPublisher};
use std::collections::VecDeque;
use tracing::trace;

#[derive(Default)]
pub struct EventOutbox {
    pending: Mutex<VecDeque<DocumentEvent>>,
    publish_lock: tokio::sync::Mutex<()>,
}

impl EventOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event. Call while holding the lock of the write it describes.
    pub fn enqueue(&self, event: DocumentEvent) {
        self.pending.lock().push_back(event);
    }

    /// Events queued but not yet published.
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    /// Publish every queued event in enqueue order. Returns how many this
    /// call published.
    pub async fn flush(&self, publisher: &dyn EventPublisher) -> usize {
        let _guard = self.publish_lock.lock().await;
        let batch: Vec<DocumentEvent> = self.pending.lock().drain(..).collect();
        let count = batch.len();
        for event in batch {
            publisher.publish(event).await;
        }
        trace!(count, "outbox flushed");
        count
    }
}
