//! # Document Store
//!
//! The append-only document list and the id counter.
//!
//! ## Locking
//!
//! ```text
//! StoreInner (RwLock)          one write section per create:
//!   ├─ documents[0] (RwLock)     allocate id + append
//!   ├─ documents[1] (RwLock)   one write section per document:
//!   └─ ...                       check eligibility + append signature
//! ```
//!
//! The list lock is never held while waiting for a document write lock,
//! so signing one document does not block creation or signing of others.

use super::outbox::EventOutbox;
use crate::domain::entities::Document;
use crate::domain::errors::{ValidationError, WorkflowError};
use crate::domain::invariants::{check_document, invariant_ids_increasing};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared_types::DocumentId;
use std::sync::Arc;

/// Persisted layout: every document plus the counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Documents in creation order
    pub documents: Vec<Document>,
    /// Next id to allocate
    pub document_counter: u64,
}

struct StoreInner {
    documents: Vec<Arc<RwLock<Document>>>,
    document_counter: u64,
}

/// Shared document state for the registry, signing engine and query service.
///
/// Carries the event outbox so that every service over one store enqueues
/// into, and flushes from, the same queue.
pub struct DocumentStore {
    inner: RwLock<StoreInner>,
    outbox: Arc<EventOutbox>,
}

impl DocumentStore {
    /// Empty store; the first document gets id 0.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                documents: Vec::new(),
                document_counter: 0,
            }),
            outbox: Arc::new(EventOutbox::new()),
        }
    }

    /// Rebuild a store from a snapshot after checking every invariant.
    ///
    /// # Errors
    /// `InvariantViolated` when ids do not match positions, the counter does
    /// not match the document count, or any document is inconsistent.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self, ValidationError> {
        let StoreSnapshot {
            documents,
            document_counter,
        } = snapshot;

        if document_counter != documents.len() as u64 {
            return Err(ValidationError::InvariantViolated(format!(
                "counter {} does not match {} documents",
                document_counter,
                documents.len()
            )));
        }
        invariant_ids_increasing(&documents)?;
        for (index, document) in documents.iter().enumerate() {
            if document.id().value() != index as u64 {
                return Err(ValidationError::InvariantViolated(format!(
                    "document {} stored at position {}",
                    document.id(),
                    index
                )));
            }
            check_document(document)?;
        }

        Ok(Self {
            inner: RwLock::new(StoreInner {
                documents: documents
                    .into_iter()
                    .map(|d| Arc::new(RwLock::new(d)))
                    .collect(),
                document_counter,
            }),
            outbox: Arc::new(EventOutbox::new()),
        })
    }

    /// Export the persisted layout.
    pub fn snapshot(&self) -> StoreSnapshot {
        let inner = self.inner.read();
        StoreSnapshot {
            documents: inner.documents.iter().map(|d| d.read().clone()).collect(),
            document_counter: inner.document_counter,
        }
    }

    /// Events committed against this store and not yet published.
    pub fn outbox(&self) -> &Arc<EventOutbox> {
        &self.outbox
    }

    pub fn len(&self) -> usize {
        self.inner.read().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Id the next created document will receive.
    pub fn next_id(&self) -> DocumentId {
        DocumentId(self.inner.read().document_counter)
    }

    /// Copy of one document.
    pub fn get(&self, id: DocumentId) -> Option<Document> {
        self.slot(id).map(|slot| slot.read().clone())
    }

    /// Copies of all documents in creation order.
    pub fn list_all(&self) -> Vec<Document> {
        let slots: Vec<_> = self.inner.read().documents.clone();
        slots.iter().map(|slot| slot.read().clone()).collect()
    }

    /// Allocate the next id and append the document built for it, under one
    /// write section.
    pub(crate) fn insert_with<F>(&self, build: F) -> Result<Document, WorkflowError>
    where
        F: FnOnce(DocumentId) -> Document,
    {
        self.insert_committed(build, |_| {})
    }

    /// Like [`insert_with`](Self::insert_with), then run `committed` on the
    /// appended document before the write section ends.
    pub(crate) fn insert_committed<F, C>(
        &self,
        build: F,
        committed: C,
    ) -> Result<Document, WorkflowError>
    where
        F: FnOnce(DocumentId) -> Document,
        C: FnOnce(&Document),
    {
        let mut inner = self.inner.write();
        let id = DocumentId(inner.document_counter);
        let next = id.next().ok_or_else(|| {
            ValidationError::InvariantViolated("document counter exhausted".into())
        })?;

        let document = build(id);
        inner.documents.push(Arc::new(RwLock::new(document.clone())));
        inner.document_counter = next.value();
        committed(&document);
        Ok(document)
    }

    /// Run `apply` with exclusive access to one document.
    pub(crate) fn transact<T, F>(&self, id: DocumentId, apply: F) -> Result<T, WorkflowError>
    where
        F: FnOnce(&mut Document) -> Result<T, WorkflowError>,
    {
        let slot = self.slot(id).ok_or(WorkflowError::NotFound(id))?;
        let mut document = slot.write();
        apply(&mut document)
    }

    fn slot(&self, id: DocumentId) -> Option<Arc<RwLock<Document>>> {
        let index = usize::try_from(id.value()).ok()?;
        self.inner.read().documents.get(index).cloned()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}
