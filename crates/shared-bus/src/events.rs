//! # Document Events
//!
//! Defines all event types that flow through the shared bus.

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, ContentId, DocumentId, Timestamp};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentEvent {
    // =========================================================================
    // DOCUMENT REGISTRY
    // =========================================================================
    /// A document was registered with its signer set.
    DocumentCreated {
        /// Newly allocated identifier.
        document_id: DocumentId,
        /// Account that registered the document.
        creator: AccountId,
        /// Content store reference.
        content_id: ContentId,
        /// Signers that must sign, in registration order.
        required_signers: Vec<AccountId>,
    },

    // =========================================================================
    // SIGNING ENGINE
    // =========================================================================
    /// A required signer signed a document.
    DocumentSigned {
        /// Signed document.
        document_id: DocumentId,
        /// Account that signed.
        signer: AccountId,
        /// Time recorded with the signature.
        timestamp: Timestamp,
        /// Signatures collected so far, including this one.
        signed: usize,
        /// Signatures required for completion.
        required: usize,
    },

    /// The last required signature arrived.
    DocumentCompleted {
        /// Completed document.
        document_id: DocumentId,
        /// Time of the final signature.
        completed_at: Timestamp,
    },
}

impl DocumentEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::DocumentCreated { .. } => EventTopic::Registry,
            Self::DocumentSigned { .. } | Self::DocumentCompleted { .. } => EventTopic::Signing,
        }
    }

    /// Document the event refers to.
    #[must_use]
    pub fn document_id(&self) -> DocumentId {
        match self {
            Self::DocumentCreated { document_id, .. }
            | Self::DocumentSigned { document_id, .. }
            | Self::DocumentCompleted { document_id, .. } => *document_id,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Document registration events.
    Registry,
    /// Signature and completion events.
    Signing,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Documents to include. Empty means all documents.
    pub documents: Vec<DocumentId>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            documents: Vec::new(),
        }
    }

    /// Create a filter for events about specific documents.
    #[must_use]
    pub fn for_documents(documents: Vec<DocumentId>) -> Self {
        Self {
            topics: Vec::new(),
            documents,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &DocumentEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let document_match =
            self.documents.is_empty() || self.documents.contains(&event.document_id());

        topic_match && document_match
    }
}
