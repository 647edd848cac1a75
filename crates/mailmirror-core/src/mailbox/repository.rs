//! Mailbox storage repository.

use mailmirror_imap::UidValidity;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::warn;

use super::model::Mailbox;
use crate::account::AccountId;
use crate::error::StoreError;

/// Repository for mailbox records.
///
/// Mailbox discovery lives outside the sync engine; whatever lists
/// folders on the server registers them here, and sync keeps the
/// `UIDVALIDITY` column current as epochs move.
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Clone)]
pub struct MailboxRepository {
    pool: SqlitePool,
}

impl MailboxRepository {
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
            CREATE TABLE IF NOT EXISTS mailboxes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                uidvalidity INTEGER NOT NULL,
                UNIQUE(account_id, name)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Register a mailbox, or refresh its UIDVALIDITY if already known.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn upsert(&self, mailbox: &Mailbox) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO mailboxes (account_id, name, uidvalidity)
            VALUES (?, ?, ?)
            ON CONFLICT(account_id, name) DO UPDATE SET
                uidvalidity = excluded.uidvalidity
            ",
        )
        .bind(mailbox.account_id.0)
        .bind(&mailbox.name)
        .bind(mailbox.uidvalidity.get())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a mailbox by account and name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, account_id: AccountId, name: &str) -> Result<Option<Mailbox>, StoreError> {
        let row = sqlx::query(
            r"SELECT account_id, name, uidvalidity FROM mailboxes WHERE account_id = ? AND name = ?",
        )
        .bind(account_id.0)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(|row| {
            let uidvalidity = UidValidity::new(row.get::<u32, _>("uidvalidity"));
            if uidvalidity.is_none() {
                warn!(account = %account_id, name, "mailbox row has zero uidvalidity, ignoring");
            }
            Some(Mailbox {
                account_id: AccountId(row.get::<i64, _>("account_id")),
                name: row.get("name"),
                uidvalidity: uidvalidity?,
            })
        }))
    }

    /// Record a new UIDVALIDITY epoch for a mailbox.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn set_uidvalidity(
        &self,
        account_id: AccountId,
        name: &str,
        uidvalidity: UidValidity,
    ) -> Result<(), StoreError> {
        sqlx::query(r"UPDATE mailboxes SET uidvalidity = ? WHERE account_id = ? AND name = ?")
            .bind(uidvalidity.get())
            .bind(account_id.0)
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
