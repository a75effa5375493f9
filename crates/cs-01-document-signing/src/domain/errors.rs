//! # Domain Errors
//!
//! Error types for the document workflow. Every failure a client can see
//! maps to exactly one [`ErrorKind`].

use shared_types::{AccountId, ContentId, DocumentId};
use std::time::Duration;
use thiserror::Error;

/// Workflow error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Input had the wrong shape.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No authenticated identity was available.
    #[error("Authentication required: {0}")]
    Authentication(#[from] IdentityError),

    /// The caller is not a required signer of the document.
    #[error("Account {signer} is not a required signer of document {document_id}")]
    UnauthorizedSigner {
        /// Target document
        document_id: DocumentId,
        /// Rejected caller
        signer: AccountId,
    },

    /// Unknown document.
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    /// The content store holds no blob for this identifier.
    #[error("Content not found: {0}")]
    ContentNotFound(ContentId),

    /// Every required signer has already signed.
    #[error("Document {0} is already completed")]
    AlreadyCompleted(DocumentId),

    /// The signer already has a signature on the document.
    #[error("Account {signer} already signed document {document_id}")]
    DuplicateSignature {
        /// Target document
        document_id: DocumentId,
        /// Repeat signer
        signer: AccountId,
    },

    /// The content store failed or timed out.
    #[error("Content store error: {0}")]
    Storage(ContentStoreError),
}

/// Bad input shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Content blob has no bytes.
    #[error("Content is empty")]
    EmptyContent,

    /// Content blob exceeds the configured maximum.
    #[error("Content is {size} bytes, maximum is {max}")]
    ContentTooLarge {
        /// Submitted size
        size: usize,
        /// Configured limit
        max: usize,
    },

    /// Content identifier is blank.
    #[error("Content id is empty")]
    EmptyContentId,

    /// No required signers were given.
    #[error("At least one required signer is needed")]
    NoRequiredSigners,

    /// A signer identifier is blank.
    #[error("Signer id is empty")]
    EmptySignerId,

    /// The same signer appears twice.
    #[error("Duplicate required signer: {0}")]
    DuplicateSigner(AccountId),

    /// Restored state breaks a document invariant.
    #[error("Invariant violated: {0}")]
    InvariantViolated(String),
}

/// Identity provider failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// No wallet/account is connected.
    #[error("no account connected")]
    NotConnected,

    /// The account declined to authorize the operation.
    #[error("authorization declined: {0}")]
    Declined(String),
}

/// Content store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentStoreError {
    /// No blob for this identifier.
    #[error("content not found: {0}")]
    NotFound(ContentId),

    /// The store refused the blob because of its size.
    #[error("blob of {size} bytes exceeds store limit of {max}")]
    TooLarge {
        /// Submitted size
        size: usize,
        /// Store limit
        max: usize,
    },

    /// The store is unreachable or failed internally.
    #[error("content store unavailable: {0}")]
    Unavailable(String),

    /// The store did not answer in time.
    #[error("content store timed out after {0:?}")]
    Timeout(Duration),
}

impl From<ContentStoreError> for WorkflowError {
    fn from(err: ContentStoreError) -> Self {
        match err {
            ContentStoreError::NotFound(content_id) => Self::ContentNotFound(content_id),
            other => Self::Storage(other),
        }
    }
}

/// Client-facing classification of a [`WorkflowError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input shape.
    Validation,
    /// No identity; prompt the user to connect.
    Authentication,
    /// Identity present but not entitled.
    Authorization,
    /// Unknown document or content.
    NotFound,
    /// Document already completed.
    AlreadyCompleted,
    /// Caller already signed.
    DuplicateSignature,
    /// Content store failure; the operation may be retried.
    Storage,
}

impl ErrorKind {
    /// Stable label for logs and metrics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::NotFound => "not_found",
            Self::AlreadyCompleted => "already_completed",
            Self::DuplicateSignature => "duplicate_signature",
            Self::Storage => "storage",
        }
    }
}

impl WorkflowError {
    /// Classify the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::UnauthorizedSigner { .. } => ErrorKind::Authorization,
            Self::NotFound(_) | Self::ContentNotFound(_) => ErrorKind::NotFound,
            Self::AlreadyCompleted(_) => ErrorKind::AlreadyCompleted,
            Self::DuplicateSignature { .. } => ErrorKind::DuplicateSignature,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// True if retrying the whole operation may succeed.
    ///
    /// No partial document is ever persisted, so a retry is always safe.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Storage
    }

    /// True if the client should prompt for (re-)authentication.
    #[must_use]
    pub fn requires_authentication(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }
}
