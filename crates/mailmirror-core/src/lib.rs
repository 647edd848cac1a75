//! # mailmirror-core
//!
//! The mailbox synchronization engine.
//!
//! One sync pass reconciles a remote IMAP mailbox's authoritative state
//! against the local SQLite cache:
//!
//! 1. load the persisted [`SyncToken`](mailmirror_imap::SyncToken) for
//!    (account, mailbox), discarding it on epoch mismatch or `force`;
//! 2. pull the raw delta from a
//!    [`RemoteMailboxSource`](mailmirror_imap::RemoteMailboxSource);
//! 3. classify every observed UID as new, changed, or vanished against
//!    the caller's known-UID baseline; the three sets are disjoint and
//!    vanished wins over changed;
//! 4. reconcile the cache (insert, reflag, delete), each bulk write
//!    atomic;
//! 5. persist the advanced token only after reconciliation landed.
//!
//! A rejected token triggers exactly one automatic full-resync retry;
//! transient remote failures surface with local state untouched, for
//! the caller's scheduler to retry.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod account;
pub mod cache;
mod error;
pub mod mailbox;
pub mod service;
pub mod sync;
pub mod token;

pub use account::{Account, AccountId, AccountRepository};
pub use cache::{CacheRepository, CachedMessage, LocalMailboxStore};
pub use error::{ClientError, Result, StoreError, SyncError};
pub use mailbox::{Mailbox, MailboxRepository};
pub use service::SyncService;
pub use sync::{Classified, SyncEngine, SyncResult, classify};
pub use token::{SyncTokenStore, TokenRepository};
