//! # Ports
//!
//! - `inbound`: the API this crate offers (registry, signing, queries)
//! - `outbound`: what it needs from the outside (identity, content, time)

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
