/// Structured error types for rowflow-core.
///
/// Uses `thiserror` for composable, matchable errors. The binary crate
/// (rowflow-cli) wraps these in `anyhow` at the top level; library
/// consumers get the structured taxonomy.

use thiserror::Error;

/// SQLite primary result codes that signal a retryable condition.
/// SQLITE_BUSY = 5, SQLITE_LOCKED = 6.
const SQLITE_BUSY: u32 = 5;
const SQLITE_LOCKED: u32 = 6;

/// Main error type for rowflow-core operations
#[derive(Error, Debug)]
pub enum DbError {
    /// Store unreachable, open failure, or auth failure. Fatal unless the
    /// caller explicitly wraps the operation in a retry policy.
    #[error("connection error: {reason}")]
    Connection {
        reason: String,
        #[source]
        source: Option<sqlx::Error>,
    },

    /// Malformed statement, misaligned bindings, or constraint violation.
    /// Propagated to the caller; never cached, never swallowed.
    #[error("query error: {reason}")]
    Query {
        reason: String,
        #[source]
        source: Option<sqlx::Error>,
    },

    /// Precondition violation (batch/page size, etc). Raised before any
    /// store access happens.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Store-signaled retryable condition (lock contention). This is the
    /// class the retry policy is designed around.
    #[error("transient store error: {reason}")]
    Transient {
        reason: String,
        #[source]
        source: Option<sqlx::Error>,
    },
}

/// Result type alias for rowflow-core operations
pub type Result<T> = std::result::Result<T, DbError>;

impl DbError {
    /// Create a connection error without an underlying sqlx source
    pub fn connection(reason: impl Into<String>) -> Self {
        Self::Connection {
            reason: reason.into(),
            source: None,
        }
    }

    /// Create a query error without an underlying sqlx source
    pub fn query(reason: impl Into<String>) -> Self {
        Self::Query {
            reason: reason.into(),
            source: None,
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Classify a sqlx error into the rowflow taxonomy.
    ///
    /// Lock contention (SQLITE_BUSY / SQLITE_LOCKED) becomes `Transient`;
    /// I/O and protocol failures become `Connection`; everything else is a
    /// `Query` error.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => {
                let reason = db.message().to_string();
                if db
                    .code()
                    .and_then(|c| c.parse::<u32>().ok())
                    // Extended result codes keep the primary code in the
                    // low byte (e.g. SQLITE_BUSY_SNAPSHOT = 517).
                    .map(|c| matches!(c & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
                    .unwrap_or(false)
                {
                    Self::Transient {
                        reason,
                        source: Some(err),
                    }
                } else {
                    Self::Query {
                        reason,
                        source: Some(err),
                    }
                }
            }
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut => {
                Self::Connection {
                    reason: err.to_string(),
                    source: Some(err),
                }
            }
            _ => Self::Query {
                reason: err.to_string(),
                source: Some(err),
            },
        }
    }

    /// Whether a retry after a delay could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DbError::invalid_argument("batch_size must be >= 1");
        assert_eq!(err.to_string(), "invalid argument: batch_size must be >= 1");

        let err = DbError::connection("unable to open database file");
        assert!(err.to_string().contains("connection error"));
    }

    #[test]
    fn test_io_error_classified_as_connection() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = DbError::from_sqlx(sqlx::Error::Io(io));

        assert!(matches!(err, DbError::Connection { .. }));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_row_not_found_classified_as_query() {
        let err = DbError::from_sqlx(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::Query { .. }));
    }
}
