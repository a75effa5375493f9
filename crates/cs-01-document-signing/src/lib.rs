//! # Document Signing Subsystem (CS-01)
//!
//! Multi-party co-signing: a creator registers content-addressed content
//! with a fixed list of required signers, each signer signs exactly once,
//! and the document completes when every required signer has signed.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Document state model, eligibility rule,
//!   validation and invariants, no I/O
//! - **Ports Layer** (`ports/`): Inbound component APIs and outbound
//!   traits for the identity provider, content store and clock
//! - **Adapters Layer** (`adapters/`): In-memory content store, wallet
//!   identity, clocks
//! - **Service Layer** (`service/`): Document store, registry, signing
//!   engine, query service and the `CoSignService` facade
//!
//! ## Concurrency
//!
//! - Creation allocates the id and appends under one store-level write lock
//! - Signing checks eligibility and appends under the document's write lock
//! - Reads return copies and never see a partially written document
//!
//! ## Error Kinds
//!
//! Every failure maps to one [`ErrorKind`]; only `Storage` is retryable.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{
    content_id_for, InMemoryContentStore, ManualTimeSource, SystemTimeSource, WalletIdentity,
};
pub use domain::{
    check_document, invariant_ids_increasing, parse_signer_list, signing_eligibility,
    ConfigError, ContentStoreError, Document, DocumentStatus, ErrorKind, IdentityError,
    SignatureRecord, SigningEligibility, SigningProgress, ValidationError, WorkflowConfig,
    WorkflowError,
};
pub use ports::inbound::{DocumentQueryApi, DocumentRegistryApi, SigningApi};
pub use ports::outbound::{
    ContentStore, IdentityProvider, Operation, SignedTransactionHandle, TimeSource,
};
pub use service::{
    CoSignService, DocumentRegistry, DocumentStore, EventOutbox, QueryService, SigningEngine,
    StoreSnapshot,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
