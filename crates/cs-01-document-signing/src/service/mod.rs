//! # Service Layer
//!
//! - `store`: shared document state and its transaction boundaries
//! - `outbox`: events queued at commit, published in commit order
//! - `registry`: creation and lookup
//! - `signing`: signature appends
//! - `query`: per-account views
//! - `workflow`: identity-aware facade publishing domain events

pub mod outbox;
pub mod query;
pub mod registry;
pub mod signing;
pub mod store;
pub mod workflow;

pub use outbox::EventOutbox;
pub use query::QueryService;
pub use registry::DocumentRegistry;
pub use signing::SigningEngine;
pub use store::{DocumentStore, StoreSnapshot};
pub use workflow::CoSignService;

use crate::domain::errors::{ContentStoreError, WorkflowError};
use cosign_telemetry::{record_rejection, time_content_store};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Count and log a rejected operation, passing the error through.
pub(crate) fn rejected(operation: &'static str, err: WorkflowError) -> WorkflowError {
    let kind = err.kind().as_str();
    record_rejection(operation, kind);
    warn!(operation, kind, error = %err, "operation rejected");
    err
}

/// Run a content store call under the deadline and latency histogram.
pub(crate) async fn measured<T, F>(
    operation: &str,
    deadline: Duration,
    call: F,
) -> Result<T, WorkflowError>
where
    F: Future<Output = Result<T, ContentStoreError>>,
{
    let _timer = time_content_store(operation);
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result.map_err(WorkflowError::from),
        Err(_) => Err(ContentStoreError::Timeout(deadline).into()),
    }
}
