//! Raw mailbox deltas reported by a remote source.

use crate::token::SyncToken;
use crate::types::{Flags, Uid, UidSet};

/// Raw change record for one mailbox since a prior checkpoint.
///
/// This is the remote's unreconciled view: UIDs it considers new, UIDs
/// whose flags moved, and UIDs it no longer reports present. The engine
/// classifies these against the caller's known-UID baseline before
/// touching the local store; the sets here may overlap when the mailbox
/// mutated during the sync window.
#[derive(Debug, Clone)]
pub struct MailboxDelta {
    /// UIDs present remotely that the prior checkpoint did not cover.
    pub new_uids: UidSet,
    /// UIDs whose flags changed since the prior checkpoint.
    pub changed_uids: UidSet,
    /// UIDs expunged since the prior checkpoint.
    pub vanished_uids: UidSet,
    /// Checkpoint describing the remote state this delta brings us to.
    pub token: SyncToken,
}

impl MailboxDelta {
    /// Creates a delta with empty change sets.
    #[must_use]
    pub fn empty(token: SyncToken) -> Self {
        Self {
            new_uids: UidSet::new(),
            changed_uids: UidSet::new(),
            vanished_uids: UidSet::new(),
            token,
        }
    }

    /// Returns true if the delta carries no changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.new_uids.is_empty() && self.changed_uids.is_empty() && self.vanished_uids.is_empty()
    }
}

/// Envelope metadata for one remote message.
///
/// The fields a mailbox listing needs; body fetching is a separate
/// concern and never flows through synchronization.
#[derive(Debug, Clone)]
pub struct MessageSummary {
    /// Message UID.
    pub uid: Uid,
    /// RFC 5322 Message-ID header, if the message carries one.
    pub message_id: Option<String>,
    /// Current flags.
    pub flags: Flags,
    /// Message subject.
    pub subject: String,
    /// Sender address.
    pub from: String,
    /// Date header as reported by the server.
    pub date: String,
}

/// An updated flag set for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagUpdate {
    /// Message UID.
    pub uid: Uid,
    /// The full current flag set.
    pub flags: Flags,
}
