//! One synchronization pass over injected collaborators.

use mailmirror_imap::{RemoteError, RemoteMailboxSource, SyncOptions, UidSet};
use tracing::{debug, info};

use super::classify::classify;
use super::result::SyncResult;
use crate::account::Account;
use crate::cache::{CachedMessage, LocalMailboxStore};
use crate::error::Result;
use crate::mailbox::Mailbox;
use crate::token::SyncTokenStore;

/// Orchestrates synchronization passes.
///
/// One pass pulls a delta from the remote source, classifies it against
/// the caller's known-UID baseline, reconciles the local store, and only
/// then persists the advanced token: token advancement must never outrun
/// local persistence, or a later pass would believe state is current
/// when the cache is not.
///
/// Passes on the same mailbox must not interleave; callers serialize
/// them (see `SyncService`). Passes on different mailboxes are
/// independent.
pub struct SyncEngine<R, L, T> {
    remote: R,
    store: L,
    tokens: T,
}

impl<R, L, T> SyncEngine<R, L, T>
where
    R: RemoteMailboxSource,
    L: LocalMailboxStore,
    T: SyncTokenStore,
{
    /// Wires an engine from its collaborators.
    pub fn new(remote: R, store: L, tokens: T) -> Self {
        Self {
            remote,
            store,
            tokens,
        }
    }

    /// Read access to the local store, for display layers that list
    /// messages from the mirror between syncs.
    pub fn store(&self) -> &L {
        &self.store
    }

    /// The remote source this engine syncs from.
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Runs one synchronization pass for `mailbox`.
    ///
    /// `known_uids` is the set of UIDs the caller currently holds; it
    /// drives vanished detection and is cleared whenever the pass falls
    /// back to a full resync (no usable token, `force`, or an epoch
    /// change; UIDs from an old epoch mean nothing in the new one).
    ///
    /// # Errors
    ///
    /// [`SyncError::TokenInvalid`] if the remote rejected the checkpoint
    /// and the automatic full-resync retry failed too;
    /// [`SyncError::Transient`] for remote failures, with local state and
    /// token untouched; [`SyncError::Persistence`] if a local write
    /// failed, with the token not advanced.
    ///
    /// [`SyncError::TokenInvalid`]: crate::SyncError::TokenInvalid
    /// [`SyncError::Transient`]: crate::SyncError::Transient
    /// [`SyncError::Persistence`]: crate::SyncError::Persistence
    pub async fn sync_mailbox(
        &self,
        account: &Account,
        mailbox: &Mailbox,
        options: &SyncOptions,
        known_uids: &UidSet,
        force: bool,
    ) -> Result<SyncResult> {
        debug_assert_eq!(account.id, mailbox.account_id);
        let account_id = account.id;
        let name = mailbox.name.as_str();

        let persisted = self.tokens.get_token(account_id, name).await?;
        let prior = persisted.filter(|token| !force && token.is_valid(mailbox.uidvalidity));
        if persisted.is_some() && prior.is_none() {
            debug!(
                account = %account_id,
                mailbox = name,
                force,
                "persisted token unusable, falling back to full resync"
            );
        }

        let (delta, known, full_resync) = match prior {
            Some(token) => {
                match self
                    .remote
                    .fetch_delta(name, Some(&token), known_uids, options)
                    .await
                {
                    Ok(delta) => (delta, known_uids.clone(), false),
                    Err(RemoteError::TokenInvalid(reason)) => {
                        debug!(
                            account = %account_id,
                            mailbox = name,
                            reason,
                            "remote rejected token, retrying as full resync"
                        );
                        let delta = self
                            .remote
                            .fetch_delta(name, None, &UidSet::new(), options)
                            .await?;
                        (delta, UidSet::new(), true)
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            None => {
                let delta = self
                    .remote
                    .fetch_delta(name, None, &UidSet::new(), options)
                    .await?;
                (delta, UidSet::new(), true)
            }
        };

        let raw = classify(&delta, &known);
        let classified = raw.clone().restrict(options);

        // A full resync overwrites rather than deltas: cached rows the
        // remote no longer lists must not survive, stale epochs included.
        if full_resync {
            let cached = self.store.list_uids(account_id, name).await?;
            let stale = cached.difference(&raw.new);
            if !stale.is_empty() {
                debug!(
                    account = %account_id,
                    mailbox = name,
                    count = stale.len(),
                    "purging cache rows absent from full enumeration"
                );
                self.store.delete_many(account_id, name, &stale).await?;
            }
        }

        let mut new_messages = Vec::new();
        if !classified.new.is_empty() {
            let summaries = self.remote.fetch_summaries(name, &classified.new).await?;
            let rows: Vec<CachedMessage> = summaries
                .iter()
                .map(|summary| CachedMessage::from_summary(account_id, name, summary))
                .collect();
            self.store.upsert_many(account_id, name, &rows).await?;
            new_messages = summaries;
        }

        let mut changed_messages = Vec::new();
        if !classified.changed.is_empty() {
            let updates = self.remote.fetch_flags(name, &classified.changed).await?;
            for update in &updates {
                self.store
                    .update_flags(account_id, name, update.uid, &update.flags)
                    .await?;
            }
            changed_messages = updates;
        }

        if !classified.vanished.is_empty() {
            self.store
                .delete_many(account_id, name, &classified.vanished)
                .await?;
        }

        // Reconciliation has landed; only now may the checkpoint move.
        self.tokens.save_token(account_id, name, &delta.token).await?;

        info!(
            account = %account_id,
            mailbox = name,
            new = new_messages.len(),
            changed = changed_messages.len(),
            vanished = classified.vanished.len(),
            full_resync,
            token = %delta.token,
            "mailbox sync complete"
        );

        Ok(SyncResult {
            new_messages,
            changed_messages,
            vanished_uids: classified.vanished,
            token: delta.token,
        })
    }
}
