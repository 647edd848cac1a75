//! The remote mailbox abstraction consumed by the sync engine.

use async_trait::async_trait;

use crate::delta::{FlagUpdate, MailboxDelta, MessageSummary};
use crate::token::SyncToken;
use crate::types::{Uid, UidSet};

/// Failures a remote source may report.
///
/// Deliberately narrow: callers above the sync boundary only ever need to
/// distinguish "my checkpoint is stale" from "try again later". Whatever
/// protocol-level error produced a variant stays inside its message.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The prior sync token was rejected: the mailbox epoch changed or the
    /// server no longer holds history back to the token's MODSEQ.
    #[error("sync token no longer valid: {0}")]
    TokenInvalid(String),

    /// Connection drop, protocol error, or any other condition worth
    /// retrying on a later sync cycle.
    #[error("transient failure: {0}")]
    Transient(String),
}

impl RemoteError {
    /// Wraps an arbitrary error as a transient failure.
    pub fn transient(err: impl std::fmt::Display) -> Self {
        Self::Transient(err.to_string())
    }
}

/// Result type for remote operations.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Which delta classes a sync pass should compute.
///
/// Mirrors the selective sync masks of classic IMAP sync APIs: a caller
/// refreshing only flag state can skip new-message and vanished
/// detection entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Detect messages that appeared since the prior checkpoint.
    pub new_messages: bool,
    /// Detect flag changes since the prior checkpoint.
    pub flag_updates: bool,
    /// Detect expunged messages since the prior checkpoint.
    pub vanished: bool,
    /// Permit the existence-probe fallback when the server cannot report
    /// vanished UIDs from the token alone (no QRESYNC).
    pub vanished_via_existence_check: bool,
    /// Upper bound on UIDs per existence probe. Large baselines are paged
    /// through in chunks of this size.
    pub existence_check_batch: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            new_messages: true,
            flag_updates: true,
            vanished: true,
            vanished_via_existence_check: true,
            existence_check_batch: 500,
        }
    }
}

/// Read-only view of a remote mailbox's change state.
///
/// Implementations wrap a protocol session (IMAP SELECT + QRESYNC fetch,
/// or plain UID SEARCH fallbacks) behind the operations the sync engine
/// needs. None of them mutate the remote.
#[async_trait]
pub trait RemoteMailboxSource: Send + Sync {
    /// Computes the raw delta for `mailbox` since `prior_token`.
    ///
    /// With no prior token this is a full enumeration: every UID present
    /// remotely comes back in `new_uids` and `vanished_uids` is empty,
    /// because there is no baseline to have vanished from. With a token,
    /// `known_uids` is the caller's local baseline; servers without
    /// QRESYNC need it to derive vanished UIDs via existence probes,
    /// bounded by [`SyncOptions::existence_check_batch`].
    ///
    /// # Errors
    ///
    /// [`RemoteError::TokenInvalid`] if the token's epoch no longer
    /// matches or the server expired its history;
    /// [`RemoteError::Transient`] for connection or protocol failures.
    async fn fetch_delta(
        &self,
        mailbox: &str,
        prior_token: Option<&SyncToken>,
        known_uids: &UidSet,
        options: &SyncOptions,
    ) -> RemoteResult<MailboxDelta>;

    /// Fetches envelope metadata for the given UIDs.
    ///
    /// UIDs expunged between delta computation and this call are simply
    /// absent from the result.
    ///
    /// # Errors
    ///
    /// [`RemoteError::Transient`] for connection or protocol failures.
    async fn fetch_summaries(
        &self,
        mailbox: &str,
        uids: &UidSet,
    ) -> RemoteResult<Vec<MessageSummary>>;

    /// Fetches the current flag set for the given UIDs.
    ///
    /// # Errors
    ///
    /// [`RemoteError::Transient`] for connection or protocol failures.
    async fn fetch_flags(&self, mailbox: &str, uids: &UidSet) -> RemoteResult<Vec<FlagUpdate>>;

    /// Probes which of the given UIDs still exist remotely.
    ///
    /// The vanished-detection fallback for servers without QRESYNC.
    /// Callers bound each probe; see [`UidSet::chunks`].
    ///
    /// # Errors
    ///
    /// [`RemoteError::Transient`] for connection or protocol failures.
    async fn probe_existing(&self, mailbox: &str, uids: &UidSet) -> RemoteResult<UidSet>;
}

// Consumers take their source by value; shared sources pass a reference
// or an Arc.
#[async_trait]
impl<T: RemoteMailboxSource + ?Sized> RemoteMailboxSource for &T {
    async fn fetch_delta(
        &self,
        mailbox: &str,
        prior_token: Option<&SyncToken>,
        known_uids: &UidSet,
        options: &SyncOptions,
    ) -> RemoteResult<MailboxDelta> {
        (**self)
            .fetch_delta(mailbox, prior_token, known_uids, options)
            .await
    }

    async fn fetch_summaries(
        &self,
        mailbox: &str,
        uids: &UidSet,
    ) -> RemoteResult<Vec<MessageSummary>> {
        (**self).fetch_summaries(mailbox, uids).await
    }

    async fn fetch_flags(&self, mailbox: &str, uids: &UidSet) -> RemoteResult<Vec<FlagUpdate>> {
        (**self).fetch_flags(mailbox, uids).await
    }

    async fn probe_existing(&self, mailbox: &str, uids: &UidSet) -> RemoteResult<UidSet> {
        (**self).probe_existing(mailbox, uids).await
    }
}

#[async_trait]
impl<T: RemoteMailboxSource + ?Sized> RemoteMailboxSource for std::sync::Arc<T> {
    async fn fetch_delta(
        &self,
        mailbox: &str,
        prior_token: Option<&SyncToken>,
        known_uids: &UidSet,
        options: &SyncOptions,
    ) -> RemoteResult<MailboxDelta> {
        (**self)
            .fetch_delta(mailbox, prior_token, known_uids, options)
            .await
    }

    async fn fetch_summaries(
        &self,
        mailbox: &str,
        uids: &UidSet,
    ) -> RemoteResult<Vec<MessageSummary>> {
        (**self).fetch_summaries(mailbox, uids).await
    }

    async fn fetch_flags(&self, mailbox: &str, uids: &UidSet) -> RemoteResult<Vec<FlagUpdate>> {
        (**self).fetch_flags(mailbox, uids).await
    }

    async fn probe_existing(&self, mailbox: &str, uids: &UidSet) -> RemoteResult<UidSet> {
        (**self).probe_existing(mailbox, uids).await
    }
}

/// Derives vanished UIDs by paging existence probes over a baseline.
///
/// Utility for [`RemoteMailboxSource`] implementations on servers that
/// cannot answer "what vanished since MODSEQ x" directly: each chunk of
/// `known_uids` is probed and whatever the server no longer reports is
/// vanished.
///
/// # Errors
///
/// Propagates the first probe failure.
pub async fn vanished_via_probes<S: RemoteMailboxSource + ?Sized>(
    source: &S,
    mailbox: &str,
    known_uids: &UidSet,
    batch: usize,
) -> RemoteResult<UidSet> {
    let mut vanished = UidSet::new();
    for chunk in known_uids.chunks(batch.max(1)) {
        let existing = source.probe_existing(mailbox, &chunk).await?;
        vanished.extend(chunk.difference(&existing));
    }
    Ok(vanished)
}

/// Convenience for building a [`UidSet`] from raw UID values, skipping
/// zeroes.
#[must_use]
pub fn uid_set_from_raw(values: &[u32]) -> UidSet {
    values.iter().copied().filter_map(Uid::new).collect()
}
