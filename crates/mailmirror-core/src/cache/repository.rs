//! SQLite-backed message cache.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mailmirror_imap::{Flags, Uid, UidSet};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};

use super::model::CachedMessage;
use super::store::LocalMailboxStore;
use crate::account::AccountId;
use crate::error::StoreError;

/// Repository for cached message storage and retrieval.
///
/// Bulk writes run in a single transaction each; SQLite's write
/// serialization keeps bulk operations on the same mailbox from
/// interleaving under concurrent callers.
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Clone)]
pub struct CacheRepository {
    pool: SqlitePool,
}

impl CacheRepository {
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
            CREATE TABLE IF NOT EXISTS cached_messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL,
                mailbox TEXT NOT NULL,
                uid INTEGER NOT NULL,
                message_id TEXT,
                flags TEXT NOT NULL DEFAULT '[]',
                subject TEXT NOT NULL DEFAULT '',
                from_addr TEXT NOT NULL DEFAULT '',
                date TEXT NOT NULL DEFAULT '',
                cached_at TEXT NOT NULL,
                UNIQUE(account_id, mailbox, uid)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_cached_messages_mailbox
            ON cached_messages(account_id, mailbox)
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn row_to_message(row: &SqliteRow) -> Option<CachedMessage> {
        let cached_at_str: String = row.get("cached_at");
        let cached_at = DateTime::parse_from_rfc3339(&cached_at_str)
            .ok()?
            .with_timezone(&Utc);
        let flags: Flags = serde_json::from_str(&row.get::<String, _>("flags")).ok()?;

        Some(CachedMessage {
            account_id: AccountId(row.get::<i64, _>("account_id")),
            mailbox: row.get("mailbox"),
            uid: Uid::new(row.get::<u32, _>("uid"))?,
            message_id: row.get("message_id"),
            flags,
            subject: row.get("subject"),
            from: row.get("from_addr"),
            date: row.get("date"),
            cached_at,
        })
    }
}

#[async_trait]
impl LocalMailboxStore for CacheRepository {
    async fn get(
        &self,
        account_id: AccountId,
        mailbox: &str,
        uid: Uid,
    ) -> Result<Option<CachedMessage>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT account_id, mailbox, uid, message_id, flags, subject, from_addr, date, cached_at
            FROM cached_messages
            WHERE account_id = ? AND mailbox = ? AND uid = ?
            ",
        )
        .bind(account_id.0)
        .bind(mailbox)
        .bind(uid.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().and_then(Self::row_to_message))
    }

    async fn upsert_many(
        &self,
        account_id: AccountId,
        mailbox: &str,
        messages: &[CachedMessage],
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for message in messages {
            let flags = serde_json::to_string(&message.flags)?;
            sqlx::query(
                r"
                INSERT INTO cached_messages
                    (account_id, mailbox, uid, message_id, flags, subject, from_addr, date, cached_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(account_id, mailbox, uid) DO UPDATE SET
                    message_id = excluded.message_id,
                    flags = excluded.flags,
                    subject = excluded.subject,
                    from_addr = excluded.from_addr,
                    date = excluded.date,
                    cached_at = excluded.cached_at
                ",
            )
            .bind(account_id.0)
            .bind(mailbox)
            .bind(message.uid.get())
            .bind(&message.message_id)
            .bind(flags)
            .bind(&message.subject)
            .bind(&message.from)
            .bind(&message.date)
            .bind(message.cached_at.to_rfc3339())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn update_flags(
        &self,
        account_id: AccountId,
        mailbox: &str,
        uid: Uid,
        flags: &Flags,
    ) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(flags)?;
        sqlx::query(
            r"
            UPDATE cached_messages
            SET flags = ?, cached_at = ?
            WHERE account_id = ? AND mailbox = ? AND uid = ?
            ",
        )
        .bind(encoded)
        .bind(Utc::now().to_rfc3339())
        .bind(account_id.0)
        .bind(mailbox)
        .bind(uid.get())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_many(
        &self,
        account_id: AccountId,
        mailbox: &str,
        uids: &UidSet,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for uid in uids.iter() {
            sqlx::query(
                r"DELETE FROM cached_messages WHERE account_id = ? AND mailbox = ? AND uid = ?",
            )
            .bind(account_id.0)
            .bind(mailbox)
            .bind(uid.get())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_uids(&self, account_id: AccountId, mailbox: &str) -> Result<UidSet, StoreError> {
        let rows = sqlx::query(
            r"SELECT uid FROM cached_messages WHERE account_id = ? AND mailbox = ? ORDER BY uid",
        )
        .bind(account_id.0)
        .bind(mailbox)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .filter_map(|row| Uid::new(row.get::<u32, _>("uid")))
            .collect())
    }
}
