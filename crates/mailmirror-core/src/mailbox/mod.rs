//! Mailbox records and their UIDVALIDITY epochs.

mod model;
mod repository;

pub use model::Mailbox;
pub use repository::MailboxRepository;
