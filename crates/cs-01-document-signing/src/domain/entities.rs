//! # Domain Entities
//!
//! The document record and its signature trail.

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, ContentId, DocumentId, Timestamp};
use std::collections::HashSet;
use std::fmt;

use super::eligibility::{signing_eligibility, SigningEligibility};

/// One signature on a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    /// Account that signed.
    pub signer: AccountId,
    /// Time the signature was accepted.
    pub timestamp: Timestamp,
}

/// Lifecycle position of a document.
///
/// Transitions are strictly forward: `Created -> PartiallySigned -> Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    /// No signatures yet.
    Created,
    /// Some but not all required signers have signed.
    PartiallySigned,
    /// Every required signer has signed.
    Completed,
}

/// Signatures collected against signatures required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningProgress {
    /// Signatures collected.
    pub signed: usize,
    /// Signatures required for completion.
    pub required: usize,
}

impl fmt::Display for SigningProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.signed, self.required)
    }
}

/// A registered document.
///
/// Everything except `signatures` is fixed at creation. `is_completed` is
/// recomputed from `signatures` on every append and never set directly.
/// Field names on the wire match the ledger's view output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    id: DocumentId,
    #[serde(rename = "content_hash")]
    content_id: ContentId,
    creator: AccountId,
    #[serde(rename = "signers")]
    required_signers: Vec<AccountId>,
    signatures: Vec<SignatureRecord>,
    is_completed: bool,
}

impl Document {
    /// New document with no signatures.
    pub(crate) fn new(
        id: DocumentId,
        content_id: ContentId,
        creator: AccountId,
        required_signers: Vec<AccountId>,
    ) -> Self {
        Self {
            id,
            content_id,
            creator,
            required_signers,
            signatures: Vec::new(),
            is_completed: false,
        }
    }

    /// Ledger-assigned identifier.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Content store reference.
    pub fn content_id(&self) -> &ContentId {
        &self.content_id
    }

    /// Account that registered the document.
    pub fn creator(&self) -> &AccountId {
        &self.creator
    }

    /// Signers fixed at creation, in registration order.
    pub fn required_signers(&self) -> &[AccountId] {
        &self.required_signers
    }

    /// Signatures in submission order.
    pub fn signatures(&self) -> &[SignatureRecord] {
        &self.signatures
    }

    /// True once every required signer has signed.
    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// True if `account` is one of the required signers.
    pub fn is_required_signer(&self, account: &AccountId) -> bool {
        self.required_signers.contains(account)
    }

    /// True if `account` already has a signature on this document.
    pub fn has_signed(&self, account: &AccountId) -> bool {
        self.signature_of(account).is_some()
    }

    /// The signature `account` submitted, if any.
    pub fn signature_of(&self, account: &AccountId) -> Option<&SignatureRecord> {
        self.signatures.iter().find(|s| &s.signer == account)
    }

    /// Whether `account` may sign right now, and if not, why.
    pub fn eligibility_of(&self, account: &AccountId) -> SigningEligibility {
        signing_eligibility(self, account)
    }

    /// Shorthand for `eligibility_of(account).is_eligible()`.
    pub fn can_be_signed_by(&self, account: &AccountId) -> bool {
        self.eligibility_of(account).is_eligible()
    }

    /// Required signers that have not signed yet, in registration order.
    pub fn remaining_signers(&self) -> Vec<&AccountId> {
        self.required_signers
            .iter()
            .filter(|s| !self.has_signed(s))
            .collect()
    }

    /// Lifecycle position.
    pub fn status(&self) -> DocumentStatus {
        if self.is_completed {
            DocumentStatus::Completed
        } else if self.signatures.is_empty() {
            DocumentStatus::Created
        } else {
            DocumentStatus::PartiallySigned
        }
    }

    /// Signatures collected against signatures required.
    pub fn progress(&self) -> SigningProgress {
        SigningProgress {
            signed: self.signatures.len(),
            required: self.required_signers.len(),
        }
    }

    /// Relative link a creator shares with signers.
    pub fn signing_path(&self) -> String {
        format!("/sign/{}", self.id)
    }

    /// Completion recomputed from `signatures` alone.
    pub fn compute_completion(&self) -> bool {
        let signed: HashSet<&AccountId> = self.signatures.iter().map(|s| &s.signer).collect();
        let required: HashSet<&AccountId> = self.required_signers.iter().collect();
        signed == required
    }

    /// Append a signature and recompute completion.
    ///
    /// Callers must have checked eligibility under the document's write lock.
    pub(crate) fn append_signature(&mut self, record: SignatureRecord) {
        self.signatures.push(record);
        self.is_completed = self.compute_completion();
    }
}
