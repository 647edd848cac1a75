//! The local message cache.
//!
//! The authoritative local mirror of remote message metadata, one row
//! per (mailbox, UID), reconciled by the sync engine.

mod model;
mod repository;
mod store;

pub use model::CachedMessage;
pub use repository::CacheRepository;
pub use store::LocalMailboxStore;
