//! # Shared Bus - Document Event Bus
//!
//! Carries the workflow's committed state changes to any interested consumer
//! (notification senders, dashboards, audit sinks).
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Registry /  │                    │   Consumer   │
//! │   Signing    │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! Events are published only after the corresponding write has committed,
//! and in commit order, so a subscriber never observes an event for state
//! that does not exist and sees a document's events in the order they
//! happened.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{DocumentEvent, EventFilter, EventTopic};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription};

/// Events buffered per receiver before the slowest one starts losing them.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
