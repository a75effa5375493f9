//! # Signing Eligibility
//!
//! The one rule deciding whether an account may sign a document now.
//! The signing engine turns a negative answer into an error; the query
//! service keeps only documents with a positive answer.

use shared_types::{AccountId, DocumentId};

use super::entities::Document;
use super::errors::WorkflowError;

/// Whether an account may sign a document, and if not, why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningEligibility {
    /// The account may sign now.
    Eligible,
    /// Every required signer has signed.
    AlreadyCompleted,
    /// The account is not a required signer.
    NotRequiredSigner,
    /// The account already signed.
    AlreadySigned,
}

/// Evaluate the signing rule.
///
/// Checks run in a fixed order: completion, membership, prior signature.
pub fn signing_eligibility(document: &Document, account: &AccountId) -> SigningEligibility {
    if document.is_completed() {
        SigningEligibility::AlreadyCompleted
    } else if !document.is_required_signer(account) {
        SigningEligibility::NotRequiredSigner
    } else if document.has_signed(account) {
        SigningEligibility::AlreadySigned
    } else {
        SigningEligibility::Eligible
    }
}

impl SigningEligibility {
    /// True if signing would be accepted.
    #[must_use]
    pub fn is_eligible(self) -> bool {
        self == Self::Eligible
    }

    /// Short user-facing explanation.
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            Self::Eligible => "Ready to sign",
            Self::AlreadyCompleted => "Document completed",
            Self::NotRequiredSigner => "Not authorized to sign",
            Self::AlreadySigned => "Already signed",
        }
    }

    /// Convert into the error the signing engine reports.
    pub fn into_result(
        self,
        document_id: DocumentId,
        account: &AccountId,
    ) -> Result<(), WorkflowError> {
        match self {
            Self::Eligible => Ok(()),
            Self::AlreadyCompleted => Err(WorkflowError::AlreadyCompleted(document_id)),
            Self::NotRequiredSigner => Err(WorkflowError::UnauthorizedSigner {
                document_id,
                signer: account.clone(),
            }),
            Self::AlreadySigned => Err(WorkflowError::DuplicateSignature {
                document_id,
                signer: account.clone(),
            }),
        }
    }
}
