//! Shared IMAP types.

mod flags;
mod identifiers;
mod uid_set;

pub use flags::{Flag, Flags};
pub use identifiers::{Uid, UidValidity};
pub use uid_set::UidSet;
