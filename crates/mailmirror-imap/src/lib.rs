//! # mailmirror-imap
//!
//! IMAP synchronization vocabulary for the mailmirror engine: message
//! UIDs and mailbox epochs, message flags, CONDSTORE/QRESYNC-style sync
//! tokens (RFC 7162), the raw mailbox delta record, and the
//! [`RemoteMailboxSource`] contract a protocol backend implements.
//!
//! ## Sync model
//!
//! A [`SyncToken`] captures `(UIDVALIDITY, HIGHESTMODSEQ)`: everything a
//! client needs to ask a server "what changed since last time" instead of
//! re-listing the mailbox.
//!
//! 1. First sync: no token, full enumeration, token captured.
//! 2. Incremental sync: present the token, receive a [`MailboxDelta`]
//!    of new / flag-changed / vanished UIDs plus the advanced token.
//! 3. Epoch change or expired history: the source reports
//!    [`RemoteError::TokenInvalid`] and the client falls back to a full
//!    enumeration.
//!
//! Servers without QRESYNC cannot report vanished UIDs from the token
//! alone; [`vanished_via_probes`] derives them from bounded existence
//! probes over the caller's known-UID baseline.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod delta;
mod source;
mod token;
pub mod types;

pub use delta::{FlagUpdate, MailboxDelta, MessageSummary};
pub use source::{
    RemoteError, RemoteMailboxSource, RemoteResult, SyncOptions, uid_set_from_raw,
    vanished_via_probes,
};
pub use token::{ModSeq, SyncToken};
pub use types::{Flag, Flags, Uid, UidSet, UidValidity};
