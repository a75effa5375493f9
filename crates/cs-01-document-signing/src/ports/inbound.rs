//! # Inbound Ports (Driving Ports)
//!
//! The three component APIs. Implementations must keep every document
//! invariant across concurrent callers.

use crate::domain::entities::Document;
use crate::domain::errors::WorkflowError;
use async_trait::async_trait;
use shared_types::{AccountId, ContentId, DocumentId};

/// Owns document creation and id assignment.
#[async_trait]
pub trait DocumentRegistryApi: Send + Sync {
    /// Upload `content` and register a document for it.
    ///
    /// ## Errors
    ///
    /// - `Authentication`: `creator` is blank
    /// - `Validation`: empty or oversized content, bad signer list
    /// - `Storage`: the content store failed or timed out
    async fn create(
        &self,
        content: Vec<u8>,
        required_signers: Vec<AccountId>,
        creator: AccountId,
    ) -> Result<Document, WorkflowError>;

    /// Register a document for content that is already stored.
    fn register(
        &self,
        content_id: ContentId,
        required_signers: Vec<AccountId>,
        creator: AccountId,
    ) -> Result<Document, WorkflowError>;

    /// Fetch one document.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no document with this id
    fn get(&self, id: DocumentId) -> Result<Document, WorkflowError>;

    /// All documents in creation order.
    fn list_all(&self) -> Vec<Document>;
}

/// Applies signatures.
pub trait SigningApi: Send + Sync {
    /// Append `signer`'s signature to document `id`.
    ///
    /// ## Errors
    ///
    /// Checked in order: `NotFound`, `AlreadyCompleted`,
    /// `UnauthorizedSigner`, `DuplicateSignature`.
    fn sign(&self, id: DocumentId, signer: &AccountId) -> Result<Document, WorkflowError>;
}

/// Read-only projections of the store.
pub trait DocumentQueryApi: Send + Sync {
    /// Documents created by `account`, in creation order.
    fn documents_created_by(&self, account: &AccountId) -> Vec<Document>;

    /// Documents `account` may sign right now.
    fn documents_pending_for(&self, account: &AccountId) -> Vec<Document>;
}
