//! The sync boundary exposed to callers.

use std::collections::HashMap;
use std::sync::Arc;

use mailmirror_imap::{RemoteMailboxSource, SyncOptions, UidSet};
use tokio::sync::Mutex;
use tracing::debug;

use crate::account::{AccountId, AccountRepository};
use crate::cache::CacheRepository;
use crate::error::{ClientError, Result};
use crate::mailbox::MailboxRepository;
use crate::sync::{SyncEngine, SyncResult};
use crate::token::TokenRepository;

/// Caller-facing synchronization service.
///
/// Resolves account and mailbox identity (rejecting unknowns before any
/// remote call) and serializes passes per (account, mailbox): the
/// engine's token-after-reconcile ordering is only safe when no
/// concurrent pass mutates the same local rows. Passes on different
/// mailboxes proceed in parallel.
pub struct SyncService<R> {
    engine: SyncEngine<R, CacheRepository, TokenRepository>,
    accounts: AccountRepository,
    mailboxes: MailboxRepository,
    locks: Mutex<HashMap<(AccountId, String), Arc<Mutex<()>>>>,
}

impl<R: RemoteMailboxSource> SyncService<R> {
    /// Wires a service from its collaborators.
    pub fn new(
        remote: R,
        accounts: AccountRepository,
        mailboxes: MailboxRepository,
        cache: CacheRepository,
        tokens: TokenRepository,
    ) -> Self {
        Self {
            engine: SyncEngine::new(remote, cache, tokens),
            accounts,
            mailboxes,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Opens a service with every repository on one database path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub async fn open(remote: R, database_path: &str) -> Result<Self> {
        Ok(Self::new(
            remote,
            AccountRepository::new(database_path).await?,
            MailboxRepository::new(database_path).await?,
            CacheRepository::new(database_path).await?,
            TokenRepository::new(database_path).await?,
        ))
    }

    /// The account registry, for the layers that manage accounts.
    #[must_use]
    pub fn accounts(&self) -> &AccountRepository {
        &self.accounts
    }

    /// The mailbox registry, for the discovery layer.
    #[must_use]
    pub fn mailboxes(&self) -> &MailboxRepository {
        &self.mailboxes
    }

    /// Read access to the message cache, for display layers that list
    /// messages from the mirror between syncs.
    #[must_use]
    pub fn cache(&self) -> &CacheRepository {
        self.engine.store()
    }

    /// The remote source this service syncs from.
    #[must_use]
    pub fn remote(&self) -> &R {
        self.engine.remote()
    }

    /// Synchronizes one mailbox with default options.
    ///
    /// `known_uids` is the set of UIDs the caller currently believes
    /// present; vanished detection is driven by it, never discovered
    /// independently.
    ///
    /// # Errors
    ///
    /// See [`SyncError`](crate::SyncError) for the failure kinds.
    pub async fn sync_mailbox(
        &self,
        account_id: AccountId,
        mailbox_name: &str,
        known_uids: &UidSet,
    ) -> Result<SyncResult> {
        self.sync_mailbox_with(
            account_id,
            mailbox_name,
            &SyncOptions::default(),
            known_uids,
            false,
        )
        .await
    }

    /// Synchronizes one mailbox with explicit options and an optional
    /// forced full resync.
    ///
    /// # Errors
    ///
    /// See [`SyncError`](crate::SyncError) for the failure kinds.
    pub async fn sync_mailbox_with(
        &self,
        account_id: AccountId,
        mailbox_name: &str,
        options: &SyncOptions,
        known_uids: &UidSet,
        force: bool,
    ) -> Result<SyncResult> {
        let account = self
            .accounts
            .get(account_id)
            .await?
            .ok_or(ClientError::UnknownAccount(account_id))?;
        let mailbox = self
            .mailboxes
            .get(account_id, mailbox_name)
            .await?
            .ok_or_else(|| ClientError::UnknownMailbox {
                account: account_id,
                name: mailbox_name.to_string(),
            })?;

        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry((account_id, mailbox.name.clone()))
                .or_default()
                .clone()
        };
        let _guard = lock.lock().await;

        let result = self
            .engine
            .sync_mailbox(&account, &mailbox, options, known_uids, force)
            .await?;

        if result.token.uidvalidity != mailbox.uidvalidity {
            debug!(
                account = %account_id,
                mailbox = mailbox_name,
                old = %mailbox.uidvalidity,
                new = %result.token.uidvalidity,
                "recording new UIDVALIDITY epoch"
            );
            self.mailboxes
                .set_uidvalidity(account_id, &mailbox.name, result.token.uidvalidity)
                .await?;
        }

        Ok(result)
    }
}
