//! Query executor: one parameterized statement, one round trip, the whole
//! result set materialized. No retries, no caching — those are layered on
//! top by the decorators in `retry`, `cache`, and `log`.

use sqlx::sqlite::SqliteConnection;

use crate::error::{DbError, Result};
use crate::query::{Query, ResultSet, Row};

/// Execute `query` against an already-acquired connection and materialize
/// its full result set.
///
/// The statement text must be non-empty; parameter alignment with `?`
/// placeholders is not checked here — a misaligned binding surfaces as a
/// [`DbError::Query`] from the store.
pub async fn execute(conn: &mut SqliteConnection, query: &Query) -> Result<ResultSet> {
    if query.text().trim().is_empty() {
        return Err(DbError::query("statement text must not be empty"));
    }

    let mut q = sqlx::query(query.text());
    for param in query.params() {
        q = param.bind_to(q);
    }

    let rows = q.fetch_all(conn).await.map_err(DbError::from_sqlx)?;
    rows.iter().map(Row::from_sqlite).collect()
}
