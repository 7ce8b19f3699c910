//! Connection pool and transaction scoping
//!
//! `Database` owns the SQLite pool and applies the embedded schema on
//! connect. Every handler body runs inside a `UnitOfWork`: dropping one
//! without calling [`UnitOfWork::finish`] rolls it back.

use crate::config::DatabaseConfig;
use crate::db::error::{DbError, DbResult};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

const SCHEMA: &str = include_str!("../../migrations/001_create_oneup.sql");

/// Shared handle to the SQLite connection pool
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database and apply the schema
    ///
    /// # Arguments
    /// * `config` - Database path and pool size
    ///
    /// # Returns
    /// * `Ok(Database)` if the pool is connected and migrated
    /// * `Err(DbError)` if connection or migration failed
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        let db_path = config.path.as_str();

        if !db_path.starts_with("sqlite:") {
            if let Some(parent) = PathBuf::from(db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        DbError::ConnectionFailed(format!("Failed to create db directory: {}", e))
                    })?;
                }
            }
        }

        // SQLite connection string format: sqlite:path/to/db.db
        let connection_string = if db_path.starts_with("sqlite:") {
            db_path.to_string()
        } else {
            format!("sqlite:{}", db_path)
        };

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| DbError::ConnectionFailed(format!("Invalid database path: {}", e)))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(path = %db_path, "Connected to SQLite database");

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Apply the embedded schema, one statement at a time
    async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations...");

        for statement in schema_statements(SCHEMA) {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    DbError::MigrationFailed(format!(
                        "{} - Statement: {}",
                        e,
                        statement.chars().take(100).collect::<String>()
                    ))
                })?;
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Begin a transaction for queries. It is always rolled back.
    pub async fn read_only(&self) -> DbResult<UnitOfWork> {
        self.begin(TxMode::ReadOnly).await
    }

    /// Begin a transaction for mutations. It commits on `finish`.
    ///
    /// Takes the write lock up front (`BEGIN IMMEDIATE`) so a read followed
    /// by a write never has to upgrade its lock, which SQLite refuses
    /// without waiting when another writer got there first.
    pub async fn read_write(&self) -> DbResult<UnitOfWork> {
        self.begin(TxMode::ReadWrite).await
    }

    async fn begin(&self, mode: TxMode) -> DbResult<UnitOfWork> {
        let tx = match mode {
            TxMode::ReadOnly => self.pool.begin().await?,
            TxMode::ReadWrite => self.pool.begin_with("BEGIN IMMEDIATE").await?,
        };
        debug!(?mode, "Transaction started");
        Ok(UnitOfWork { tx, mode })
    }

    /// Get the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// How a [`UnitOfWork`] ends on normal completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    /// Rolled back: nothing a query does is kept
    ReadOnly,
    /// Committed
    ReadWrite,
}

/// A request-scoped transaction
///
/// Dereferences to the connection so it can be handed to anything that
/// implements the repository traits.
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
    mode: TxMode,
}

impl UnitOfWork {
    /// Mode this unit of work was opened with
    pub fn mode(&self) -> TxMode {
        self.mode
    }

    /// End the transaction normally: commit when read-write, roll back when read-only
    pub async fn finish(self) -> DbResult<()> {
        match self.mode {
            TxMode::ReadOnly => self.tx.rollback().await?,
            TxMode::ReadWrite => self.tx.commit().await?,
        }
        debug!(mode = ?self.mode, "Transaction finished");
        Ok(())
    }
}

impl Deref for UnitOfWork {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}

impl DerefMut for UnitOfWork {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tx
    }
}

/// Split a SQL script into executable statements
///
/// Comment lines and trailing `--` comments are dropped, then the script is
/// split on `;`.
fn schema_statements(script: &str) -> Vec<String> {
    let mut cleaned_sql = String::new();
    for line in script.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }
        let without_comments = match trimmed.find("--") {
            Some(comment_pos) => &trimmed[..comment_pos],
            None => trimmed,
        };
        cleaned_sql.push_str(without_comments.trim());
        cleaned_sql.push(' ');
    }

    cleaned_sql
        .split(';')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
