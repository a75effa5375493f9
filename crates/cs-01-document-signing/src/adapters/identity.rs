//! # Wallet Identity
//!
//! Identity provider backed by a single connected wallet account.

use crate::domain::errors::IdentityError;
use crate::ports::outbound::{IdentityProvider, Operation, SignedTransactionHandle};
use parking_lot::RwLock;
use shared_types::AccountId;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};
use uuid::Uuid;

/// A wallet session: at most one connected account at a time.
#[derive(Default)]
pub struct WalletIdentity {
    account: RwLock<Option<AccountId>>,
    declining: AtomicBool,
}

impl WalletIdentity {
    /// Disconnected wallet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wallet already connected to `account`.
    pub fn connected(account: impl Into<AccountId>) -> Self {
        let wallet = Self::new();
        wallet.connect(account);
        wallet
    }

    /// Connect (or switch to) `account`.
    pub fn connect(&self, account: impl Into<AccountId>) {
        let account = account.into();
        info!(account = %account, "wallet connected");
        *self.account.write() = Some(account);
    }

    /// Drop the current account.
    pub fn disconnect(&self) {
        if let Some(account) = self.account.write().take() {
            info!(account = %account, "wallet disconnected");
        }
    }

    /// Make the wallet refuse every authorization request.
    pub fn set_declining(&self, declining: bool) {
        self.declining.store(declining, Ordering::SeqCst);
    }
}

impl IdentityProvider for WalletIdentity {
    fn current_account(&self) -> Option<AccountId> {
        self.account.read().clone()
    }

    fn authorize(&self, operation: &Operation) -> Result<SignedTransactionHandle, IdentityError> {
        let account = self.current_account().ok_or(IdentityError::NotConnected)?;
        if self.declining.load(Ordering::SeqCst) {
            return Err(IdentityError::Declined(format!(
                "{} rejected by {}",
                operation.name(),
                account
            )));
        }

        let handle = SignedTransactionHandle {
            handle_id: Uuid::new_v4(),
            account,
            operation: operation.clone(),
        };
        debug!(handle = %handle.handle_id, operation = operation.name(), "operation authorized");
        Ok(handle)
    }
}
