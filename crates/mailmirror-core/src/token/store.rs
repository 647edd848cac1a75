//! The sync token persistence contract.

use async_trait::async_trait;
use mailmirror_imap::SyncToken;

use crate::account::AccountId;
use crate::error::StoreError;

/// Persisted checkpoint storage, one token per (account, mailbox).
///
/// The engine reads the token at the start of a pass and writes it back
/// only after reconciliation has fully landed in the local store.
#[async_trait]
pub trait SyncTokenStore: Send + Sync {
    /// Load the persisted token for a mailbox, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    async fn get_token(
        &self,
        account_id: AccountId,
        mailbox: &str,
    ) -> Result<Option<SyncToken>, StoreError>;

    /// Persist the token for a mailbox, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn save_token(
        &self,
        account_id: AccountId,
        mailbox: &str,
        token: &SyncToken,
    ) -> Result<(), StoreError>;

    /// Drop the persisted token for a mailbox.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn clear_token(&self, account_id: AccountId, mailbox: &str) -> Result<(), StoreError>;
}
