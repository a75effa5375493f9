//! # Signing Engine
//!
//! The only writer of signatures. Each call is one transaction on one
//! document: the eligibility check and the append happen under the same
//! write lock, so two racing calls by the same signer cannot both pass.

use super::outbox::EventOutbox;
use super::rejected;
use super::store::DocumentStore;
use crate::domain::eligibility::signing_eligibility;
use crate::domain::entities::{Document, SignatureRecord};
use crate::domain::errors::WorkflowError;
use crate::ports::inbound::SigningApi;
use crate::ports::outbound::TimeSource;
use cosign_telemetry::{log_document_event, DOCUMENTS_COMPLETED, SIGNATURES_APPENDED};
use shared_bus::DocumentEvent;
use shared_types::{AccountId, DocumentId};
use std::sync::Arc;

const SUBSYSTEM: &str = "signing";

pub struct SigningEngine<T: TimeSource> {
    store: Arc<DocumentStore>,
    clock: Arc<T>,
    outbox: Option<Arc<EventOutbox>>,
}

impl<T: TimeSource> SigningEngine<T> {
    pub fn new(store: Arc<DocumentStore>, clock: Arc<T>) -> Self {
        Self {
            store,
            clock,
            outbox: None,
        }
    }

    /// Enqueue `DocumentSigned` (and `DocumentCompleted` on the last
    /// signature) inside each signing transaction.
    #[must_use]
    pub fn with_outbox(mut self, outbox: Arc<EventOutbox>) -> Self {
        self.outbox = Some(outbox);
        self
    }
}

fn signing_events(document: &Document, signer: &AccountId, timestamp: u64) -> Vec<DocumentEvent> {
    let progress = document.progress();
    let mut events = vec![DocumentEvent::DocumentSigned {
        document_id: document.id(),
        signer: signer.clone(),
        timestamp,
        signed: progress.signed,
        required: progress.required,
    }];
    if document.is_completed() {
        events.push(DocumentEvent::DocumentCompleted {
            document_id: document.id(),
            completed_at: timestamp,
        });
    }
    events
}

impl<T: TimeSource> SigningApi for SigningEngine<T> {
    fn sign(&self, id: DocumentId, signer: &AccountId) -> Result<Document, WorkflowError> {
        let result = self.store.transact(id, |document| {
            signing_eligibility(document, signer).into_result(id, signer)?;
            let timestamp = self.clock.now();
            document.append_signature(SignatureRecord {
                signer: signer.clone(),
                timestamp,
            });
            if let Some(outbox) = &self.outbox {
                for event in signing_events(document, signer, timestamp) {
                    outbox.enqueue(event);
                }
            }
            Ok(document.clone())
        });

        let document = result.map_err(|e| rejected("sign", e))?;

        SIGNATURES_APPENDED.inc();
        let progress = document.progress();
        log_document_event!(
            info,
            SUBSYSTEM,
            "signature appended",
            id,
            signer = %signer,
            progress = %progress
        );
        if document.is_completed() {
            DOCUMENTS_COMPLETED.inc();
            log_document_event!(info, SUBSYSTEM, "document completed", id);
        }
        Ok(document)
    }
}
