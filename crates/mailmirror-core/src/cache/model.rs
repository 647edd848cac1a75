//! Cached message models.

use chrono::{DateTime, Utc};
use mailmirror_imap::{Flags, MessageSummary, Uid};

use crate::account::AccountId;

/// Local record of one remote message, keyed by (mailbox, UID).
///
/// Created when a message is first observed as new, mutated when its
/// flags change, deleted when it vanishes. The set of cached UIDs for a
/// mailbox is always a subset of what the remote reported present as of
/// the last successful sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedMessage {
    /// Account this message belongs to.
    pub account_id: AccountId,
    /// Mailbox name the message lives in.
    pub mailbox: String,
    /// Message UID within the mailbox's current epoch.
    pub uid: Uid,
    /// RFC 5322 Message-ID header, if the message carries one.
    pub message_id: Option<String>,
    /// Current flag set.
    pub flags: Flags,
    /// Message subject.
    pub subject: String,
    /// Sender address.
    pub from: String,
    /// Date header as reported by the server.
    pub date: String,
    /// When this record was written.
    pub cached_at: DateTime<Utc>,
}

impl CachedMessage {
    /// Build a cache record from a remote summary.
    #[must_use]
    pub fn from_summary(account_id: AccountId, mailbox: &str, summary: &MessageSummary) -> Self {
        Self {
            account_id,
            mailbox: mailbox.to_string(),
            uid: summary.uid,
            message_id: summary.message_id.clone(),
            flags: summary.flags.clone(),
            subject: summary.subject.clone(),
            from: summary.from.clone(),
            date: summary.date.clone(),
            cached_at: Utc::now(),
        }
    }
}
