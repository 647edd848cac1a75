//! The local mailbox store contract.

use async_trait::async_trait;
use mailmirror_imap::{Flags, Uid, UidSet};

use super::model::CachedMessage;
use crate::account::AccountId;
use crate::error::StoreError;

/// Authoritative local cache of message metadata per mailbox.
///
/// Every bulk operation is atomic from the caller's perspective: a
/// reconciliation pass never leaves the store reflecting only part of a
/// classified delta. No atomicity is promised *across* calls; the
/// engine's token-after-reconcile ordering covers that. Implementations
/// must not interleave bulk operations on the same mailbox under
/// concurrent callers.
#[async_trait]
pub trait LocalMailboxStore: Send + Sync {
    /// Look up one cached message.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    async fn get(
        &self,
        account_id: AccountId,
        mailbox: &str,
        uid: Uid,
    ) -> Result<Option<CachedMessage>, StoreError>;

    /// Insert or update a batch of messages, atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; no partial batch survives.
    async fn upsert_many(
        &self,
        account_id: AccountId,
        mailbox: &str,
        messages: &[CachedMessage],
    ) -> Result<(), StoreError>;

    /// Replace the flag set of one cached message.
    ///
    /// A no-op if the UID is not cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn update_flags(
        &self,
        account_id: AccountId,
        mailbox: &str,
        uid: Uid,
        flags: &Flags,
    ) -> Result<(), StoreError>;

    /// Delete a batch of messages, atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; no partial batch survives.
    async fn delete_many(
        &self,
        account_id: AccountId,
        mailbox: &str,
        uids: &UidSet,
    ) -> Result<(), StoreError>;

    /// List every cached UID for a mailbox.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    async fn list_uids(&self, account_id: AccountId, mailbox: &str) -> Result<UidSet, StoreError>;
}
