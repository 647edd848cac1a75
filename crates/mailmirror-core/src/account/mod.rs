//! Account identity.
//!
//! Accounts are owned by the caller; synchronization resolves an id to a
//! record so unknown accounts are rejected before any remote call.

mod model;
mod repository;

pub use model::{Account, AccountId};
pub use repository::AccountRepository;
