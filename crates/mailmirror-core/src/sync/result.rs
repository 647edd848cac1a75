//! The output contract of one sync pass.

use mailmirror_imap::{FlagUpdate, MessageSummary, SyncToken, UidSet};

/// The classified outcome of one synchronization pass.
///
/// The three sets are disjoint: a UID appears in exactly one of them.
/// The token is the checkpoint the pass advanced to; it has already been
/// persisted by the time a caller sees this value.
#[derive(Debug, Clone)]
pub struct SyncResult {
    /// Messages observed for the first time, with full metadata.
    pub new_messages: Vec<MessageSummary>,
    /// Previously known messages whose flags moved, with the new flags.
    pub changed_messages: Vec<FlagUpdate>,
    /// Previously known UIDs the remote no longer reports.
    pub vanished_uids: UidSet,
    /// The checkpoint this pass advanced to.
    pub token: SyncToken,
}

impl SyncResult {
    /// Returns true if the pass observed no changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.new_messages.is_empty()
            && self.changed_messages.is_empty()
            && self.vanished_uids.is_empty()
    }
}
