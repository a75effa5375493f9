//! # Adapters
//!
//! In-process implementations of the outbound ports.

pub mod clock;
pub mod content_store;
pub mod identity;

pub use clock::{ManualTimeSource, SystemTimeSource};
pub use content_store::{content_id_for, InMemoryContentStore};
pub use identity::WalletIdentity;
