//! # Domain Invariants
//!
//! Business rules that must always hold true for documents.

use shared_types::AccountId;
use std::collections::HashSet;

use super::entities::Document;
use super::errors::ValidationError;
use super::validation::validate_required_signers;

/// Invariant: required signers are non-empty and distinct.
pub fn invariant_required_signers(document: &Document) -> Result<(), ValidationError> {
    validate_required_signers(document.required_signers()).map_err(|e| {
        ValidationError::InvariantViolated(format!("document {}: {}", document.id(), e))
    })
}

/// Invariant: no signer appears twice in `signatures`.
pub fn invariant_unique_signatures(document: &Document) -> Result<(), ValidationError> {
    let mut seen: HashSet<&AccountId> = HashSet::new();
    for record in document.signatures() {
        if !seen.insert(&record.signer) {
            return Err(ValidationError::InvariantViolated(format!(
                "document {}: {} signed twice",
                document.id(),
                record.signer
            )));
        }
    }
    Ok(())
}

/// Invariant: every signature belongs to a required signer.
pub fn invariant_signers_required(document: &Document) -> Result<(), ValidationError> {
    match document
        .signatures()
        .iter()
        .find(|r| !document.is_required_signer(&r.signer))
    {
        Some(record) => Err(ValidationError::InvariantViolated(format!(
            "document {}: {} is not a required signer",
            document.id(),
            record.signer
        ))),
        None => Ok(()),
    }
}

/// Invariant: the stored completion flag equals the recomputed one.
pub fn invariant_completion_derived(document: &Document) -> Result<(), ValidationError> {
    if document.is_completed() != document.compute_completion() {
        return Err(ValidationError::InvariantViolated(format!(
            "document {}: stored completion {} disagrees with signatures",
            document.id(),
            document.is_completed()
        )));
    }
    Ok(())
}

/// All per-document invariants.
pub fn check_document(document: &Document) -> Result<(), ValidationError> {
    invariant_required_signers(document)?;
    invariant_unique_signatures(document)?;
    invariant_signers_required(document)?;
    invariant_completion_derived(document)
}

/// Invariant: ids are strictly increasing in creation order.
pub fn invariant_ids_increasing(documents: &[Document]) -> Result<(), ValidationError> {
    for pair in documents.windows(2) {
        if pair[0].id() >= pair[1].id() {
            return Err(ValidationError::InvariantViolated(format!(
                "document {} follows {}",
                pair[1].id(),
                pair[0].id()
            )));
        }
    }
    Ok(())
}
