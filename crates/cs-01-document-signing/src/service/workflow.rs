//! # Co-Sign Service
//!
//! The write and read surface a client talks to. Resolves the caller
//! through the identity provider, has every write authorized, delegates to
//! the registry / signing engine / query service, then flushes the events
//! those writes enqueued onto the event bus.
//!
//! ```text
//! client ─→ CoSignService ─→ IdentityProvider.authorize()
//!                │
//!                ├─→ DocumentRegistry ─→ ContentStore
//!                │        └─→ EventOutbox (under the store lock)
//!                ├─→ SigningEngine
//!                │        └─→ EventOutbox (under the document lock)
//!                ├─→ QueryService
//!                └─→ EventOutbox.flush() ─→ EventPublisher
//! ```

use super::outbox::EventOutbox;
use super::query::QueryService;
use super::registry::DocumentRegistry;
use super::rejected;
use super::signing::SigningEngine;
use super::store::DocumentStore;
use crate::domain::config::{ConfigError, WorkflowConfig};
use crate::domain::eligibility::{signing_eligibility, SigningEligibility};
use crate::domain::entities::Document;
use crate::domain::errors::{IdentityError, WorkflowError};
use crate::ports::inbound::{DocumentQueryApi, DocumentRegistryApi, SigningApi};
use crate::ports::outbound::{ContentStore, IdentityProvider, Operation, TimeSource};
use shared_bus::EventPublisher;
use shared_types::{AccountId, ContentId, DocumentId};
use std::sync::Arc;
use tracing::debug;

/// Identity-aware facade over the workflow components.
pub struct CoSignService<C, I, T>
where
    C: ContentStore,
    I: IdentityProvider,
    T: TimeSource,
{
    store: Arc<DocumentStore>,
    registry: DocumentRegistry<C>,
    engine: SigningEngine<T>,
    query: QueryService,
    identity: Arc<I>,
    outbox: Arc<EventOutbox>,
    events: Arc<dyn EventPublisher>,
}

impl<C, I, T> CoSignService<C, I, T>
where
    C: ContentStore + 'static,
    I: IdentityProvider,
    T: TimeSource,
{
    /// Service over an empty store.
    ///
    /// # Errors
    /// The configuration fails [`WorkflowConfig::validate`].
    pub fn new(
        config: WorkflowConfig,
        content: Arc<C>,
        identity: Arc<I>,
        clock: Arc<T>,
        events: Arc<dyn EventPublisher>,
    ) -> Result<Self, ConfigError> {
        Self::with_store(
            Arc::new(DocumentStore::new()),
            config,
            content,
            identity,
            clock,
            events,
        )
    }

    /// Service over existing state, e.g. a restored snapshot or a store
    /// shared with other sessions. Sessions sharing a store share its event
    /// outbox and should share one publisher.
    pub fn with_store(
        store: Arc<DocumentStore>,
        config: WorkflowConfig,
        content: Arc<C>,
        identity: Arc<I>,
        clock: Arc<T>,
        events: Arc<dyn EventPublisher>,
    ) -> Result<Self, ConfigError> {
        let outbox = store.outbox().clone();
        Ok(Self {
            registry: DocumentRegistry::new(store.clone(), content, config)?
                .with_outbox(outbox.clone()),
            engine: SigningEngine::new(store.clone(), clock).with_outbox(outbox.clone()),
            query: QueryService::new(store.clone()),
            store,
            identity,
            outbox,
            events,
        })
    }

    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    pub fn registry(&self) -> &DocumentRegistry<C> {
        &self.registry
    }

    pub fn query(&self) -> &QueryService {
        &self.query
    }

    // =========================================================================
    // WRITE SURFACE
    // =========================================================================

    /// Upload `content`, then register it with `required_signers`.
    ///
    /// The connected account becomes the creator. The upload happens
    /// before authorization; a declined authorization leaves an
    /// unreferenced blob behind.
    pub async fn create_document(
        &self,
        content: Vec<u8>,
        required_signers: Vec<AccountId>,
    ) -> Result<Document, WorkflowError> {
        self.connected_account("create")?;
        let content_id = self.registry.upload(content, &required_signers).await?;
        self.register_document(content_id, required_signers).await
    }

    /// Register a document for content already in the content store.
    pub async fn register_document(
        &self,
        content_id: ContentId,
        required_signers: Vec<AccountId>,
    ) -> Result<Document, WorkflowError> {
        let operation = Operation::CreateDocument {
            content_id: content_id.clone(),
            required_signers: required_signers.clone(),
        };
        let handle = self
            .identity
            .authorize(&operation)
            .map_err(|e| rejected("create", e.into()))?;

        let document = self
            .registry
            .register(content_id, required_signers, handle.account)?;
        self.outbox.flush(self.events.as_ref()).await;
        Ok(document)
    }

    /// Sign document `id` as the connected account.
    pub async fn sign_document(&self, id: DocumentId) -> Result<Document, WorkflowError> {
        let handle = self
            .identity
            .authorize(&Operation::SignDocument { document_id: id })
            .map_err(|e| rejected("sign", e.into()))?;

        let document = self.engine.sign(id, &handle.account)?;
        self.outbox.flush(self.events.as_ref()).await;
        Ok(document)
    }

    // =========================================================================
    // READ SURFACE
    // =========================================================================

    pub fn get_document(&self, id: DocumentId) -> Result<Document, WorkflowError> {
        self.registry.get(id)
    }

    pub fn get_all_documents(&self) -> Vec<Document> {
        self.registry.list_all()
    }

    /// Content of document `id`, fetched from the content store.
    pub async fn fetch_content(&self, id: DocumentId) -> Result<Vec<u8>, WorkflowError> {
        self.registry.fetch_content(id).await
    }

    /// Documents the connected account created.
    pub fn my_documents(&self) -> Result<Vec<Document>, WorkflowError> {
        let account = self.connected_account("my_documents")?;
        Ok(self.query.documents_created_by(&account))
    }

    /// Documents the connected account may sign now.
    pub fn my_pending_documents(&self) -> Result<Vec<Document>, WorkflowError> {
        let account = self.connected_account("my_pending_documents")?;
        Ok(self.query.documents_pending_for(&account))
    }

    /// Whether the connected account may sign document `id`, and why not.
    pub fn signing_eligibility(&self, id: DocumentId) -> Result<SigningEligibility, WorkflowError> {
        let account = self.connected_account("signing_eligibility")?;
        let document = self.registry.get(id)?;
        let eligibility = signing_eligibility(&document, &account);
        debug!(document_id = %id, account = %account, ?eligibility, "eligibility checked");
        Ok(eligibility)
    }

    fn connected_account(&self, operation: &'static str) -> Result<AccountId, WorkflowError> {
        self.identity
            .current_account()
            .ok_or_else(|| rejected(operation, IdentityError::NotConnected.into()))
    }
}
