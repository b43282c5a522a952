//! Query logger: a passive observability hook.
//!
//! Emits a best-effort record of the statement text and a timestamp before
//! the wrapped operation runs. Never alters control flow, never suppresses
//! or modifies the operation's result or failure.

use std::future::Future;

use chrono::Utc;
use tracing::info;

use crate::error::Result;
use crate::query::Query;

/// Sentinel recorded when no SQL text can be derived from the arguments.
const NO_QUERY_SENTINEL: &str = "(no query text derived)";

/// Log the statement about to run, then invoke `op` and pass its outcome
/// through untouched.
pub async fn logged<T, F, Fut>(query: &Query, op: F) -> Result<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let recorded = if query.looks_like_sql() {
        query.text().trim()
    } else {
        NO_QUERY_SENTINEL
    };
    info!(
        timestamp = %Utc::now().format("%Y-%m-%d %H:%M:%S"),
        query = recorded,
        "executing SQL query"
    );

    op().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;

    #[tokio::test]
    async fn passes_success_through() {
        let result = logged(&Query::new("SELECT 1"), || async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn passes_failure_through_unchanged() {
        let result: Result<()> = logged(&Query::new("not sql"), || async {
            Err(DbError::query("syntax error"))
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
