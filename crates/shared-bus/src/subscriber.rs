//! # Receiving Side
//!
//! A [`Subscription`] pulls matching events one at a time and keeps its
//! documents registered as watched until dropped. An [`EventStream`] is the
//! same feed as a `Stream`, for consumers that compose with combinators.

use crate::events::{DocumentEvent, EventFilter};
use shared_types::DocumentId;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::warn;

/// Live subscription counts. A subscription with no document filter
/// watches every document.
#[derive(Default)]
pub(crate) struct Watchers {
    everything: AtomicUsize,
    by_document: Mutex<HashMap<DocumentId, usize>>,
}

impl Watchers {
    pub(crate) fn register(self: &Arc<Self>, documents: &[DocumentId]) -> WatchGuard {
        let mut documents = documents.to_vec();
        documents.sort_unstable();
        documents.dedup();

        if documents.is_empty() {
            self.everything.fetch_add(1, Ordering::Relaxed);
        } else if let Ok(mut map) = self.by_document.lock() {
            for id in &documents {
                *map.entry(*id).or_insert(0) += 1;
            }
        }
        WatchGuard {
            watchers: self.clone(),
            documents,
        }
    }

    pub(crate) fn count(&self, document_id: DocumentId) -> usize {
        let specific = self
            .by_document
            .lock()
            .map(|map| map.get(&document_id).copied().unwrap_or(0))
            .unwrap_or(0);
        self.everything.load(Ordering::Relaxed) + specific
    }
}

pub(crate) struct WatchGuard {
    watchers: Arc<Watchers>,
    documents: Vec<DocumentId>,
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        if self.documents.is_empty() {
            self.watchers.everything.fetch_sub(1, Ordering::Relaxed);
            return;
        }
        let Ok(mut map) = self.watchers.by_document.lock() else {
            return;
        };
        for id in &self.documents {
            if let Some(count) = map.get_mut(id) {
                *count -= 1;
                if *count == 0 {
                    map.remove(id);
                }
            }
        }
    }
}

/// Pull-based handle on the bus.
pub struct Subscription {
    receiver: broadcast::Receiver<DocumentEvent>,
    filter: EventFilter,
    _guard: WatchGuard,
}

impl Subscription {
    pub(crate) fn new(
        receiver: broadcast::Receiver<DocumentEvent>,
        filter: EventFilter,
        guard: WatchGuard,
    ) -> Self {
        Self {
            receiver,
            filter,
            _guard: guard,
        }
    }

    /// Next event the filter admits, or `None` once the bus is gone.
    ///
    /// A subscriber that falls more than the channel capacity behind loses
    /// the oldest events and carries on from the oldest retained one.
    pub async fn recv(&mut self) -> Option<DocumentEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, documents = ?self.filter.documents, "subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

/// Filtered event feed as a [`Stream`].
pub struct EventStream {
    inner: Pin<Box<BroadcastStream<DocumentEvent>>>,
    filter: EventFilter,
}

impl EventStream {
    pub(crate) fn new(receiver: broadcast::Receiver<DocumentEvent>, filter: EventFilter) -> Self {
        Self {
            inner: Box::pin(BroadcastStream::new(receiver)),
            filter,
        }
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl Stream for EventStream {
    type Item = DocumentEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match self.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(event))) if self.filter.matches(&event) => {
                    return Poll::Ready(Some(event))
                }
                Poll::Ready(Some(Ok(_))) => {}
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(missed)))) => {
                    warn!(missed, "event stream lagged");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
