//! # Error Types
//!
//! Errors raised while parsing shared identifiers.

use thiserror::Error;

/// Errors that can occur when parsing identifiers from external input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The value is not a valid document identifier.
    #[error("Invalid document id: {0:?}")]
    InvalidDocumentId(String),
}
