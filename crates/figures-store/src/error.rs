//! # Store Error Types
//!
//! Error types for inventory and order store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / redis::RedisError                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ├──► ReserveError::Store        (reservation path)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OrderError::StorageFailure (figures-orders)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  503 storage_unavailable (figures-api)                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use figures_core::FigureKind;
use thiserror::Error;

/// Store operation errors.
///
/// These errors wrap sqlx and redis errors and provide additional context
/// for debugging and for deciding whether a retry makes sense.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created or opened
    /// - Redis server unreachable
    /// - Pool closed during shutdown
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    ///
    /// ## When This Occurs
    /// - Invalid SQL in migration
    /// - Migration version conflict
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// SQLite reported SQLITE_BUSY / SQLITE_LOCKED.
    ///
    /// ## When This Occurs
    /// - Another writer held the lock past `busy_timeout`
    ///
    /// The SQLite inventory retries these a bounded number of times.
    #[error("Store busy: {0}")]
    Busy(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A reservation did not finish within its deadline.
    #[error("Operation timed out after {millis} ms")]
    Timeout { millis: u64 },

    /// Redis returned an error or a reply we could not interpret.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Attempted to provision a negative count.
    #[error("Invalid stock for {kind}: {count}")]
    InvalidStock { kind: FigureKind, count: i64 },

    /// Internal store error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Whether this error is lock contention that may clear on retry.
    pub fn is_busy(&self) -> bool {
        matches!(self, StoreError::Busy(_))
    }
}

/// SQLite primary result codes for lock contention.
const SQLITE_BUSY: i64 = 5;
const SQLITE_LOCKED: i64 = 6;

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database (BUSY/LOCKED) → StoreError::Busy
/// sqlx::Error::Database (other)       → StoreError::QueryFailed
/// sqlx::Error::PoolTimedOut           → StoreError::PoolExhausted
/// sqlx::Error::PoolClosed             → StoreError::ConnectionFailed
/// sqlx::Error::Io                     → StoreError::ConnectionFailed
/// Other                               → StoreError::Internal
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                // SQLite reports the extended code; the low byte is the primary code.
                let primary = db_err
                    .code()
                    .and_then(|code| code.parse::<i64>().ok())
                    .map(|code| code & 0xff);

                let msg = db_err.message();

                if matches!(primary, Some(SQLITE_BUSY) | Some(SQLITE_LOCKED))
                    || msg.contains("database is locked")
                    || msg.contains("database table is locked")
                {
                    StoreError::Busy(msg.to_string())
                } else {
                    StoreError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,

            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::Io(io_err) => StoreError::ConnectionFailed(io_err.to_string()),

            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
            StoreError::ConnectionFailed(err.to_string())
        } else if err.is_timeout() {
            StoreError::Backend(format!("timed out: {err}"))
        } else {
            StoreError::Backend(err.to_string())
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Reserve Error
// =============================================================================

/// Why a batch reservation did not happen.
///
/// In both cases no inventory record changed.
#[derive(Debug, Error)]
pub enum ReserveError {
    /// The first kind (in batch order) that lacked stock.
    #[error("Insufficient stock for {kind}: requested {requested}, available {available}")]
    InsufficientStock {
        kind: FigureKind,
        requested: i64,
        available: i64,
    },

    /// The backend failed before deciding.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<sqlx::Error> for ReserveError {
    fn from(err: sqlx::Error) -> Self {
        ReserveError::Store(err.into())
    }
}

impl From<redis::RedisError> for ReserveError {
    fn from(err: redis::RedisError) -> Self {
        ReserveError::Store(err.into())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
