//! Database error types
//!
//! Wraps `sqlx` failures with enough categorization for the API layer to
//! tell a constraint violation apart from an outage.

use thiserror::Error;

/// Database operation errors
#[derive(Debug, Error)]
pub enum DbError {
    /// The database file could not be opened or the pool is closed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema migration failed at startup
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// UNIQUE index violation
    #[error("Duplicate value for {field}")]
    UniqueViolation {
        /// `table.column` reported by SQLite
        field: String,
    },

    /// FOREIGN KEY constraint violation
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation {
        /// Raw message from SQLite
        message: String,
    },

    /// Any other error reported by the database engine
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// All connections in use and the acquire timed out
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A stored JSON document could not be encoded or decoded
    #[error("Invalid stored document: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal database error
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// True when this is a UNIQUE violation on the given `table.column`
    pub fn is_unique_violation_on(&self, column: &str) -> bool {
        matches!(self, DbError::UniqueViolation { field } if field == column)
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),
            sqlx::Error::Io(e) => DbError::ConnectionFailed(e.to_string()),
            _ => DbError::Internal(err.to_string()),
        }
    }
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;
