//! CONDSTORE/QRESYNC-style sync tokens (RFC 7162).
//!
//! CONDSTORE provides modification sequence numbers (`MODSEQ`) that track
//! changes to messages. Each message has a `MODSEQ` value that increases
//! whenever the message's flags or other metadata change, and the server
//! maintains a `HIGHESTMODSEQ` per mailbox. A sync token captures the
//! (`UIDVALIDITY`, `HIGHESTMODSEQ`) pair, which is enough to request an
//! incremental delta instead of a full listing on the next sync.

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

use crate::types::UidValidity;

/// Modification sequence number (MODSEQ).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ModSeq(NonZeroU64);

impl ModSeq {
    /// Creates a new `ModSeq` from a non-zero u64.
    #[must_use]
    pub fn new(value: NonZeroU64) -> Self {
        Self(value)
    }

    /// Creates a new `ModSeq` from a u64, returning `None` if zero.
    #[must_use]
    pub fn from_u64(value: u64) -> Option<Self> {
        NonZeroU64::new(value).map(Self)
    }

    /// Returns the raw value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl std::fmt::Display for ModSeq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for ModSeq {
    type Error = &'static str;

    fn try_from(value: u64) -> std::result::Result<Self, Self::Error> {
        Self::from_u64(value).ok_or("ModSeq cannot be zero")
    }
}

/// Opaque checkpoint of last-known mailbox state.
///
/// A token is associated 1:1 with a (mailbox, `UIDVALIDITY`) pair. It is
/// created on the first full sync, advanced after every successful
/// incremental sync, and discarded when the epoch changes or the remote
/// rejects it as expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncToken {
    /// The UIDVALIDITY epoch the token was captured under.
    pub uidvalidity: UidValidity,
    /// The HIGHESTMODSEQ when the token was captured.
    pub highestmodseq: ModSeq,
}

impl SyncToken {
    /// Creates a new token.
    #[must_use]
    pub fn new(uidvalidity: UidValidity, highestmodseq: ModSeq) -> Self {
        Self {
            uidvalidity,
            highestmodseq,
        }
    }

    /// Returns true if the token is still usable against the given epoch.
    ///
    /// A false result means the mailbox was rebuilt: the token and every
    /// cached UID recorded under it must be discarded and a full resync
    /// performed.
    #[must_use]
    pub fn is_valid(&self, epoch: UidValidity) -> bool {
        self.uidvalidity == epoch
    }

    /// Returns a token advanced to a new HIGHESTMODSEQ in the same epoch.
    #[must_use]
    pub fn advanced(self, highestmodseq: ModSeq) -> Self {
        Self {
            uidvalidity: self.uidvalidity,
            highestmodseq,
        }
    }
}

impl std::fmt::Display for SyncToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.uidvalidity, self.highestmodseq)
    }
}
