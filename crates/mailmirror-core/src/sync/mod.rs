//! The synchronization engine.
//!
//! Classification is pure; the engine is the only place where remote
//! reads and local writes are sequenced, and it owns the
//! token-after-reconcile invariant.

mod classify;
mod engine;
mod result;

pub use classify::{Classified, classify};
pub use engine::SyncEngine;
pub use result::SyncResult;
