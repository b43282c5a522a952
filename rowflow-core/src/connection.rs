//! Scoped connection lifecycle.
//!
//! Every executor path in this crate runs inside [`with_connection`], which
//! guarantees that exactly one of commit/rollback happens exactly once,
//! followed by a close, on every exit path of the scope body. Commit iff the
//! body returned `Ok`; rollback otherwise, re-raising the body's error
//! unchanged after cleanup.
//!
//! A handle never outlives its scope and is never shared across concurrent
//! scopes: the body gets `&mut SqliteConnection` for the duration of the
//! call and nothing else.

use std::path::Path;

use futures::future::BoxFuture;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use tracing::{debug, warn};

use crate::error::{DbError, Result};

/// Open a connection to the SQLite database at `path`, creating the file if
/// it does not exist yet (matching `sqlite3.connect` semantics).
///
/// Open failure fails fast with [`DbError::Connection`]; no partial handle
/// is returned.
pub async fn connect(path: impl AsRef<Path>) -> Result<SqliteConnection> {
    let path = path.as_ref();
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let conn = options.connect().await.map_err(|err| DbError::Connection {
        reason: format!("failed to open database at {:?}", path),
        source: Some(err),
    })?;

    debug!(path = %path.display(), "database connection established");
    Ok(conn)
}

/// Run `body` against a freshly opened connection inside a transaction.
///
/// On `Ok` the transaction commits and the connection closes; on `Err` it
/// rolls back, closes, and the original error propagates. The rollback and
/// close never mask the body's failure.
pub async fn with_connection<T, F>(path: impl AsRef<Path>, body: F) -> Result<T>
where
    F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, Result<T>>,
{
    let mut conn = connect(path).await?;

    if let Err(err) = sqlx::query("BEGIN").execute(&mut conn).await {
        let _ = conn.close().await;
        return Err(DbError::from_sqlx(err));
    }

    match body(&mut conn).await {
        Ok(value) => {
            if let Err(err) = sqlx::query("COMMIT").execute(&mut conn).await {
                let _ = conn.close().await;
                return Err(DbError::from_sqlx(err));
            }
            conn.close().await.map_err(DbError::from_sqlx)?;
            debug!("transaction committed, connection closed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rb) = sqlx::query("ROLLBACK").execute(&mut conn).await {
                warn!(error = %rb, "rollback failed during cleanup");
            }
            let _ = conn.close().await;
            debug!("transaction rolled back, connection closed");
            Err(err)
        }
    }
}
