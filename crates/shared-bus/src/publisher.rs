//! # Publishing Side
//!
//! Workflow services hand committed events to an [`EventPublisher`].
//! [`InMemoryEventBus`] fans each one out to every live receiver over a
//! tokio broadcast channel; per-document filtering happens when receiving.

use crate::events::{DocumentEvent, EventFilter};
use crate::subscriber::{EventStream, Subscription, Watchers};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use shared_types::DocumentId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// Sink for committed document events.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Deliver `event` to current receivers and return how many got a copy.
    async fn publish(&self, event: DocumentEvent) -> usize;

    /// Events handed to [`Self::publish`] so far, delivered or not.
    fn events_published(&self) -> u64;
}

/// Broadcast bus for one process.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<DocumentEvent>,
    watchers: Arc<Watchers>,
    published: AtomicU64,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// A receiver more than `capacity` events behind skips ahead.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            watchers: Arc::new(Watchers::default()),
            published: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, documents = ?filter.documents, "subscribed");
        let guard = self.watchers.register(&filter.documents);
        Subscription::new(self.sender.subscribe(), filter, guard)
    }

    /// Follow every event about one document.
    #[must_use]
    pub fn watch(&self, document_id: DocumentId) -> Subscription {
        self.subscribe(EventFilter::for_documents(vec![document_id]))
    }

    /// Filtered stream of events. Streams are not counted by [`Self::watchers`].
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.sender.subscribe(), filter)
    }

    /// Live subscriptions whose filter admits events about `document_id`.
    #[must_use]
    pub fn watchers(&self, document_id: DocumentId) -> usize {
        self.watchers.count(document_id)
    }

    /// Open receivers of any kind.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: DocumentEvent) -> usize {
        let document_id = event.document_id();
        let topic = event.topic();
        self.published.fetch_add(1, Ordering::Relaxed);

        // send only fails when nobody is listening
        let receivers = self.sender.send(event).unwrap_or(0);
        debug!(%document_id, ?topic, receivers, "event published");
        receivers
    }

    fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}
