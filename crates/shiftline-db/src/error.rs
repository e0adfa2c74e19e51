//! # Persistence Error Types
//!
//! Error types for snapshot store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error) / store outage                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PersistenceError (this module) ← Adds context and categorization      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Shift runner logs it; the shift carries on in memory                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Nothing here is fatal. The worst outcome is an unpersisted shift.

use thiserror::Error;

/// Snapshot store errors.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The store cannot be reached.
    ///
    /// ## When This Occurs
    /// - Remote store offline
    /// - In-memory store switched off in tests
    #[error("Snapshot store unavailable: {0}")]
    Unavailable(String),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored field could not be encoded or decoded.
    #[error("Corrupt field '{path}': {message}")]
    CorruptField { path: String, message: String },

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal store error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl PersistenceError {
    pub fn corrupt(path: impl Into<String>, message: impl ToString) -> Self {
        PersistenceError::CorruptField {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Convert sqlx errors to PersistenceError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → QueryFailed
/// sqlx::Error::PoolTimedOut   → PoolExhausted
/// sqlx::Error::PoolClosed     → Unavailable
/// sqlx::Error::Io             → Unavailable
/// Other                       → Internal
/// ```
impl From<sqlx::Error> for PersistenceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => PersistenceError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => PersistenceError::PoolExhausted,
            sqlx::Error::PoolClosed => PersistenceError::Unavailable("Pool is closed".to_string()),
            sqlx::Error::Io(io) => PersistenceError::Unavailable(io.to_string()),
            _ => PersistenceError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for PersistenceError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        PersistenceError::MigrationFailed(err.to_string())
    }
}

/// Result type for store operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;
