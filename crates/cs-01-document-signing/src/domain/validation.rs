//! # Input Validation
//!
//! Shape checks applied before anything touches the content store or the
//! document store.

use shared_types::{AccountId, ContentId};
use std::collections::HashSet;

use super::errors::ValidationError;

/// Content must be non-empty and no larger than `max_bytes`.
pub fn validate_content(content: &[u8], max_bytes: usize) -> Result<(), ValidationError> {
    if content.is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    if content.len() > max_bytes {
        return Err(ValidationError::ContentTooLarge {
            size: content.len(),
            max: max_bytes,
        });
    }
    Ok(())
}

/// Content identifier must not be blank.
pub fn validate_content_id(content_id: &ContentId) -> Result<(), ValidationError> {
    if content_id.is_empty() {
        return Err(ValidationError::EmptyContentId);
    }
    Ok(())
}

/// Signer list must be non-empty, without blanks or duplicates.
pub fn validate_required_signers(signers: &[AccountId]) -> Result<(), ValidationError> {
    if signers.is_empty() {
        return Err(ValidationError::NoRequiredSigners);
    }

    let mut seen = HashSet::with_capacity(signers.len());
    for signer in signers {
        if signer.is_empty() {
            return Err(ValidationError::EmptySignerId);
        }
        if !seen.insert(signer) {
            return Err(ValidationError::DuplicateSigner(signer.clone()));
        }
    }
    Ok(())
}

/// Parse a comma-separated signer list such as `"0xa, 0xb"`.
///
/// Entries are trimmed. The result is validated with
/// [`validate_required_signers`].
pub fn parse_signer_list(input: &str) -> Result<Vec<AccountId>, ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::NoRequiredSigners);
    }

    let signers: Vec<AccountId> = input
        .split(',')
        .map(|entry| AccountId::new(entry.trim()))
        .collect();

    validate_required_signers(&signers)?;
    Ok(signers)
}
