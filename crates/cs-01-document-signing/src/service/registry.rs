//! # Document Registry
//!
//! Creation and lookup. The registry is the only writer of new documents
//! and the only allocator of ids.

use super::outbox::EventOutbox;
use super::store::DocumentStore;
use super::{measured, rejected};
use crate::domain::config::{ConfigError, WorkflowConfig};
use crate::domain::entities::Document;
use crate::domain::errors::{IdentityError, WorkflowError};
use crate::domain::validation::{validate_content, validate_content_id, validate_required_signers};
use crate::ports::inbound::DocumentRegistryApi;
use crate::ports::outbound::ContentStore;
use async_trait::async_trait;
use cosign_telemetry::{log_document_event, DOCUMENTS_CREATED, DOCUMENTS_STORED};
use shared_bus::DocumentEvent;
use shared_types::{AccountId, ContentId, DocumentId};
use std::sync::Arc;
use tracing::debug;

const SUBSYSTEM: &str = "registry";

/// Document registry over a content store.
pub struct DocumentRegistry<C: ContentStore> {
    store: Arc<DocumentStore>,
    content: Arc<C>,
    config: WorkflowConfig,
    outbox: Option<Arc<EventOutbox>>,
}

impl<C: ContentStore + 'static> DocumentRegistry<C> {
    /// # Errors
    /// The configuration fails [`WorkflowConfig::validate`].
    pub fn new(
        store: Arc<DocumentStore>,
        content: Arc<C>,
        config: WorkflowConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            store,
            content,
            config,
            outbox: None,
        })
    }

    /// Enqueue `DocumentCreated` inside each creation's write section.
    #[must_use]
    pub fn with_outbox(mut self, outbox: Arc<EventOutbox>) -> Self {
        self.outbox = Some(outbox);
        self
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Validate and upload content, bounded by the configured timeout.
    ///
    /// Signers are validated first so that a bad request never uploads.
    pub async fn upload(
        &self,
        content: Vec<u8>,
        required_signers: &[AccountId],
    ) -> Result<ContentId, WorkflowError> {
        validate_required_signers(required_signers)
            .and_then(|()| validate_content(&content, self.config.max_content_bytes))
            .map_err(|e| rejected("create", e.into()))?;

        let timeout = self.config.content_store_timeout;
        measured("put", timeout, self.content.put(content))
            .await
            .map_err(|e| rejected("create", e))
    }

    /// Read a document's content from the content store.
    ///
    /// # Errors
    /// `NotFound` for an unknown document, `ContentNotFound` when the store
    /// lost the blob, `Storage` on failure or timeout.
    pub async fn fetch_content(&self, id: DocumentId) -> Result<Vec<u8>, WorkflowError> {
        let document = self.get(id)?;
        let timeout = self.config.content_store_timeout;
        measured("get", timeout, self.content.get(document.content_id()))
            .await
            .map_err(|e| rejected("fetch_content", e))
    }
}

#[async_trait]
impl<C: ContentStore + 'static> DocumentRegistryApi for DocumentRegistry<C> {
    async fn create(
        &self,
        content: Vec<u8>,
        required_signers: Vec<AccountId>,
        creator: AccountId,
    ) -> Result<Document, WorkflowError> {
        if creator.is_empty() {
            return Err(rejected("create", IdentityError::NotConnected.into()));
        }
        let content_id = self.upload(content, &required_signers).await?;
        self.register(content_id, required_signers, creator)
    }

    fn register(
        &self,
        content_id: ContentId,
        required_signers: Vec<AccountId>,
        creator: AccountId,
    ) -> Result<Document, WorkflowError> {
        if creator.is_empty() {
            return Err(rejected("create", IdentityError::NotConnected.into()));
        }
        validate_content_id(&content_id)
            .and_then(|()| validate_required_signers(&required_signers))
            .map_err(|e| rejected("create", e.into()))?;

        let document = self.store.insert_committed(
            |id| Document::new(id, content_id, creator, required_signers),
            |document| {
                if let Some(outbox) = &self.outbox {
                    outbox.enqueue(DocumentEvent::DocumentCreated {
                        document_id: document.id(),
                        creator: document.creator().clone(),
                        content_id: document.content_id().clone(),
                        required_signers: document.required_signers().to_vec(),
                    });
                }
            },
        )?;

        DOCUMENTS_CREATED.inc();
        DOCUMENTS_STORED.set(self.store.len() as i64);
        log_document_event!(
            info,
            SUBSYSTEM,
            "document created",
            document.id(),
            creator = %document.creator(),
            content_id = %document.content_id(),
            signers = document.required_signers().len()
        );
        Ok(document)
    }

    fn get(&self, id: DocumentId) -> Result<Document, WorkflowError> {
        debug!(document_id = %id, "get document");
        self.store.get(id).ok_or(WorkflowError::NotFound(id))
    }

    fn list_all(&self) -> Vec<Document> {
        self.store.list_all()
    }
}
