//! # Outbound Ports (Driven Ports / SPI)
//!
//! Collaborators the workflow depends on but does not implement: the
//! wallet-backed identity provider, the content-addressable blob store and
//! a clock.

use crate::domain::errors::{ContentStoreError, IdentityError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{AccountId, ContentId, DocumentId, Timestamp};
use uuid::Uuid;

/// Content-addressable blob store.
///
/// Identical blobs yield identical identifiers.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store a blob and return its identifier.
    ///
    /// # Errors
    /// * `ContentStoreError::TooLarge` - the store refuses blobs of this size
    /// * `ContentStoreError::Unavailable` - the store cannot be reached
    async fn put(&self, blob: Vec<u8>) -> Result<ContentId, ContentStoreError>;

    /// Fetch a blob by identifier.
    ///
    /// # Errors
    /// * `ContentStoreError::NotFound` - no blob with this identifier
    /// * `ContentStoreError::Unavailable` - the store cannot be reached
    async fn get(&self, content_id: &ContentId) -> Result<Vec<u8>, ContentStoreError>;
}

/// A state-changing operation the identity provider is asked to authorize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    /// Register a document for an already stored blob.
    CreateDocument {
        /// Content being registered
        content_id: ContentId,
        /// Signers fixed at creation
        required_signers: Vec<AccountId>,
    },
    /// Append the caller's signature.
    SignDocument {
        /// Target document
        document_id: DocumentId,
    },
}

impl Operation {
    /// Name used in logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateDocument { .. } => "create_document",
            Self::SignDocument { .. } => "sign_document",
        }
    }
}

/// Proof that an account approved an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransactionHandle {
    /// Unique per authorization
    pub handle_id: Uuid,
    /// Account that approved
    pub account: AccountId,
    /// What was approved
    pub operation: Operation,
}

/// Source of the caller's identity.
pub trait IdentityProvider: Send + Sync {
    /// The connected account, if any.
    fn current_account(&self) -> Option<AccountId>;

    /// Ask the connected account to approve `operation`.
    ///
    /// # Errors
    /// * `IdentityError::NotConnected` - no account is connected
    /// * `IdentityError::Declined` - the account refused
    fn authorize(&self, operation: &Operation) -> Result<SignedTransactionHandle, IdentityError>;
}

/// Wall clock for signature timestamps.
pub trait TimeSource: Send + Sync {
    /// Current time in seconds since the Unix epoch.
    fn now(&self) -> Timestamp;
}
