//! The single SQLite connection every domain operation runs through.

use crate::config::Config;
use crate::db::value::{bind_all, Value};
use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqliteRow};
use sqlx::Connection;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

struct Inner {
    conn: SqliteConnection,
    last_insert_id: Option<i64>,
}

impl Inner {
    /// SQLite reports 0 until the connection has inserted a row.
    fn record_rowid(&mut self, rowid: i64) {
        if rowid != 0 {
            self.last_insert_id = Some(rowid);
        }
    }
}

/// Exclusively owned handle to one SQLite connection.
///
/// Statements are serialized behind a mutex, so an insert and the row id it
/// produced are always observed together.
pub struct Database {
    inner: Mutex<Inner>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

impl Database {
    /// Open the database described by `config`.
    ///
    /// File databases are created if missing and put in WAL mode.
    ///
    /// # Errors
    /// Returns an error if the connection cannot be opened.
    pub async fn connect(config: &Config) -> Result<Self> {
        let options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else {
            if let Some(parent) = Path::new(&config.database_path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).ok();
                }
            }
            SqliteConnectOptions::new()
                .filename(&config.database_path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
        };

        let options = options
            .foreign_keys(config.foreign_keys)
            .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

        let conn = SqliteConnection::connect_with(&options).await?;
        info!(
            path = %config.database_path,
            foreign_keys = config.foreign_keys,
            "Database connection opened"
        );

        Ok(Database {
            inner: Mutex::new(Inner {
                conn,
                last_insert_id: None,
            }),
        })
    }

    /// Open a private in-memory database.
    pub async fn open_in_memory() -> Result<Self> {
        Self::connect(&Config::in_memory()).await
    }

    /// Run a query and return every row it produces.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn fetch_all<'q>(
        &self,
        sql: &'q str,
        params: &[Value<'q>],
    ) -> Result<Vec<SqliteRow>> {
        debug!(sql = sql.trim(), params = params.len(), "fetch");
        let mut inner = self.inner.lock().await;
        let rows = bind_all(sqlx::query(sql), params)
            .fetch_all(&mut inner.conn)
            .await?;
        Ok(rows)
    }

    /// Run a statement and return the number of rows it changed.
    ///
    /// # Errors
    /// Returns an error if the statement fails.
    pub async fn execute<'q>(&self, sql: &'q str, params: &[Value<'q>]) -> Result<u64> {
        debug!(sql = sql.trim(), params = params.len(), "execute");
        let mut inner = self.inner.lock().await;
        let result = bind_all(sqlx::query(sql), params)
            .execute(&mut inner.conn)
            .await?;
        inner.record_rowid(result.last_insert_rowid());
        Ok(result.rows_affected())
    }

    /// Run an INSERT and return the id of the inserted row.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert<'q>(&self, sql: &'q str, params: &[Value<'q>]) -> Result<i64> {
        debug!(sql = sql.trim(), params = params.len(), "insert");
        let mut inner = self.inner.lock().await;
        let result = bind_all(sqlx::query(sql), params)
            .execute(&mut inner.conn)
            .await?;
        let id = result.last_insert_rowid();
        inner.record_rowid(id);
        Ok(id)
    }

    /// Row id of the latest row inserted through this handle, by any method.
    pub async fn last_insert_id(&self) -> Option<i64> {
        self.inner.lock().await.last_insert_id
    }

    /// Run `;`-separated statements in order.
    ///
    /// # Errors
    /// Stops at and returns the first failing statement's error.
    pub async fn execute_batch(&self, sql: &str) -> Result<()> {
        let mut inner = self.inner.lock().await;
        for statement in sql.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                let result = sqlx::query(trimmed).execute(&mut inner.conn).await?;
                inner.record_rowid(result.last_insert_rowid());
            }
        }
        Ok(())
    }
}
