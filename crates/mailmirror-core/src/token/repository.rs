//! SQLite-backed sync token persistence.

use async_trait::async_trait;
use chrono::Utc;
use mailmirror_imap::{ModSeq, SyncToken, UidValidity};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::warn;

use super::store::SyncTokenStore;
use crate::account::AccountId;
use crate::error::StoreError;

/// Repository for persisted sync tokens, one per (account, mailbox).
///
/// MODSEQ values are 63-bit-plus and stored as text to avoid integer
/// truncation in SQLite.
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Clone)]
pub struct TokenRepository {
    pool: SqlitePool,
}

impl TokenRepository {
    /// Create a new repository with the given database path.
    ///
    /// Creates the database and tables if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn new(database_path: &str) -> Result<Self, StoreError> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let repo = Self { pool };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Create an in-memory repository for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let repo = Self { pool };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Initialize database schema.
    async fn initialize(&self) -> Result<(), StoreError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS sync_tokens (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL,
                mailbox TEXT NOT NULL,
                uidvalidity INTEGER NOT NULL,
                highestmodseq TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(account_id, mailbox)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl SyncTokenStore for TokenRepository {
    async fn get_token(
        &self,
        account_id: AccountId,
        mailbox: &str,
    ) -> Result<Option<SyncToken>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT uidvalidity, highestmodseq
            FROM sync_tokens
            WHERE account_id = ? AND mailbox = ?
            ",
        )
        .bind(account_id.0)
        .bind(mailbox)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(|row| {
            let uidvalidity = UidValidity::new(row.get::<u32, _>("uidvalidity"));
            let highestmodseq = row
                .get::<String, _>("highestmodseq")
                .parse::<u64>()
                .ok()
                .and_then(ModSeq::from_u64);
            match (uidvalidity, highestmodseq) {
                (Some(uidvalidity), Some(highestmodseq)) => {
                    Some(SyncToken::new(uidvalidity, highestmodseq))
                }
                _ => {
                    warn!(account = %account_id, mailbox, "discarding corrupt sync token row");
                    None
                }
            }
        }))
    }

    async fn save_token(
        &self,
        account_id: AccountId,
        mailbox: &str,
        token: &SyncToken,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO sync_tokens (account_id, mailbox, uidvalidity, highestmodseq, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(account_id, mailbox) DO UPDATE SET
                uidvalidity = excluded.uidvalidity,
                highestmodseq = excluded.highestmodseq,
                updated_at = excluded.updated_at
            ",
        )
        .bind(account_id.0)
        .bind(mailbox)
        .bind(token.uidvalidity.get())
        .bind(token.highestmodseq.get().to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn clear_token(&self, account_id: AccountId, mailbox: &str) -> Result<(), StoreError> {
        sqlx::query(r"DELETE FROM sync_tokens WHERE account_id = ? AND mailbox = ?")
            .bind(account_id.0)
            .bind(mailbox)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
