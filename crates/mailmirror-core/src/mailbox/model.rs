//! Mailbox model types.

use mailmirror_imap::UidValidity;
use serde::{Deserialize, Serialize};

use crate::account::AccountId;

/// A named remote folder, identified by account + name.
///
/// Carries the last known `UIDVALIDITY` epoch. UIDs are only meaningful
/// within one epoch: when the remote reports a different value, every
/// cached UID and sync token recorded for this mailbox is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mailbox {
    /// Owning account.
    pub account_id: AccountId,
    /// Folder name, e.g. `"INBOX"`.
    pub name: String,
    /// Last known UIDVALIDITY epoch.
    pub uidvalidity: UidValidity,
}

impl Mailbox {
    /// Create a mailbox record.
    #[must_use]
    pub fn new(account_id: AccountId, name: impl Into<String>, uidvalidity: UidValidity) -> Self {
        Self {
            account_id,
            name: name.into(),
            uidvalidity,
        }
    }
}
