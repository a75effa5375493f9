//! # Domain Module
//!
//! Core domain types for the document workflow: the document record, the
//! shared signing rule, validation, invariants and configuration.

pub mod config;
pub mod eligibility;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod validation;


pub use config::*;
pub use eligibility::*;
pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use validation::*;
