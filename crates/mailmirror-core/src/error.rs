//! Error types for the sync engine.

use mailmirror_imap::RemoteError;
use thiserror::Error;

use crate::account::AccountId;

/// Failures of the local persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization/deserialization of a stored value failed.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Caller mistakes rejected before any remote call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No account with the given id.
    #[error("unknown account: {0}")]
    UnknownAccount(AccountId),

    /// No mailbox with the given name registered for the account.
    #[error("unknown mailbox {name:?} for account {account}")]
    UnknownMailbox {
        /// Account the lookup ran against.
        account: AccountId,
        /// The mailbox name the caller passed.
        name: String,
    },
}

/// Discriminated failure kinds surfaced at the sync boundary.
///
/// Every failure a sync pass can produce maps to exactly one of these;
/// no protocol-library error type crosses this boundary.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The persisted checkpoint was rejected and the automatic full
    /// resync retry failed as well. Recoverable: the next pass starts
    /// from scratch.
    #[error("sync token invalid and full resync failed: {reason}")]
    TokenInvalid {
        /// What the remote reported.
        reason: String,
    },

    /// Network or protocol failure. Local state and token are untouched;
    /// the caller's scheduler owns the retry.
    #[error("transient sync failure: {message}")]
    Transient {
        /// What the remote reported.
        message: String,
    },

    /// Local store write failed mid-reconciliation. The token was not
    /// advanced, so the next pass re-fetches the same delta.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),

    /// The caller passed an unknown account or mailbox.
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl From<RemoteError> for SyncError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::TokenInvalid(reason) => Self::TokenInvalid { reason },
            RemoteError::Transient(message) => Self::Transient { message },
        }
    }
}

impl From<sqlx::Error> for SyncError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(StoreError::Database(err))
    }
}

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
