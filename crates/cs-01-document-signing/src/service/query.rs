//! # Query Service
//!
//! Read-only projections. Every call reads the store fresh.

use super::store::DocumentStore;
use crate::domain::eligibility::signing_eligibility;
use crate::domain::entities::Document;
use crate::ports::inbound::DocumentQueryApi;
use shared_types::AccountId;
use std::sync::Arc;
use tracing::debug;

pub struct QueryService {
    store: Arc<DocumentStore>,
}

impl QueryService {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Documents `account` has signed, in creation order.
    pub fn documents_signed_by(&self, account: &AccountId) -> Vec<Document> {
        self.filtered(|doc| doc.has_signed(account))
    }

    fn filtered<P>(&self, keep: P) -> Vec<Document>
    where
        P: Fn(&Document) -> bool,
    {
        self.store.list_all().into_iter().filter(|d| keep(d)).collect()
    }
}

impl DocumentQueryApi for QueryService {
    fn documents_created_by(&self, account: &AccountId) -> Vec<Document> {
        let docs = self.filtered(|doc| doc.creator() == account);
        debug!(account = %account, count = docs.len(), "documents created by");
        docs
    }

    fn documents_pending_for(&self, account: &AccountId) -> Vec<Document> {
        let docs = self.filtered(|doc| signing_eligibility(doc, account).is_eligible());
        debug!(account = %account, count = docs.len(), "documents pending");
        docs
    }
}
