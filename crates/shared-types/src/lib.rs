//! # Shared Types Crate
//!
//! Identifier types used across the Co-Sign workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `AccountId`, `ContentId` and `DocumentId` are
//!   defined once and shared by every crate.
//! - **Opaque Identity**: account and content identifiers are compared byte
//!   for byte; nothing here interprets wallet addresses or content hashes.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
