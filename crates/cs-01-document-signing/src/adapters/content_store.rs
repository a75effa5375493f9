//! # In-Memory Content Store
//!
//! Content-addressed blob map. Identifiers are `sha256:` followed by the
//! hex digest of the blob, so uploading the same bytes twice stores one
//! blob and returns the same id.

use crate::domain::errors::ContentStoreError;
use crate::ports::outbound::ContentStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use shared_types::ContentId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::debug;

const CONTENT_ID_PREFIX: &str = "sha256:";

/// Content identifier for `blob`.
pub fn content_id_for(blob: &[u8]) -> ContentId {
    let digest = Sha256::digest(blob);
    ContentId::new(format!("{}{}", CONTENT_ID_PREFIX, hex::encode(digest)))
}

/// Blob store held in memory.
///
/// Availability and latency can be switched at runtime to exercise the
/// workflow's failure paths.
pub struct InMemoryContentStore {
    blobs: RwLock<HashMap<ContentId, Vec<u8>>>,
    max_blob_bytes: usize,
    available: AtomicBool,
    latency: Option<Duration>,
}

impl InMemoryContentStore {
    /// Store with no size limit of its own.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
            max_blob_bytes: usize::MAX,
            available: AtomicBool::new(true),
            latency: None,
        }
    }

    /// Refuse blobs larger than `max_blob_bytes`.
    #[must_use]
    pub fn with_max_blob_bytes(mut self, max_blob_bytes: usize) -> Self {
        self.max_blob_bytes = max_blob_bytes;
        self
    }

    /// Delay every call by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Toggle availability. An unavailable store fails every call.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of distinct blobs held.
    pub fn blob_count(&self) -> usize {
        self.blobs.read().len()
    }

    async fn enter(&self) -> Result<(), ContentStoreError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ContentStoreError::Unavailable("store offline".into()))
        }
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn put(&self, blob: Vec<u8>) -> Result<ContentId, ContentStoreError> {
        self.enter().await?;
        if blob.len() > self.max_blob_bytes {
            return Err(ContentStoreError::TooLarge {
                size: blob.len(),
                max: self.max_blob_bytes,
            });
        }

        let content_id = content_id_for(&blob);
        let size = blob.len();
        self.blobs.write().entry(content_id.clone()).or_insert(blob);
        debug!(content_id = %content_id, size, "blob stored");
        Ok(content_id)
    }

    async fn get(&self, content_id: &ContentId) -> Result<Vec<u8>, ContentStoreError> {
        self.enter().await?;
        self.blobs
            .read()
            .get(content_id)
            .cloned()
            .ok_or_else(|| ContentStoreError::NotFound(content_id.clone()))
    }
}
