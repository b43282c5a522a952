//! Lazy streaming primitives: row-by-row, chunked batches, and offset-based
//! pages.
//!
//! # Architecture
//!
//! [`stream_rows`] is a channel-backed producer: a spawned task owns the
//! connection and its cursor, and rows cross a capacity-1 channel so
//! production stays paced by consumption — at no point is the full result
//! set materialized. Each stream instance is one-pass and non-restartable;
//! re-iterating an exhausted stream yields nothing.
//!
//! # Error policy
//!
//! A mid-stream fetch error terminates the sequence early after a warn
//! diagnostic. Rows already yielded stay yielded — partial progress remains
//! visible rather than being retracted through the iteration protocol.
//!
//! # Resource release
//!
//! The producer task releases its connection and cursor when the stream is
//! exhausted OR abandoned: dropping the receiver makes the next send fail,
//! which tears the producer down.

use std::path::{Path, PathBuf};

use futures::channel::mpsc;
use futures::{SinkExt, Stream, StreamExt};
use sqlx::Connection;
use tracing::{debug, warn};

use crate::connection::connect;
use crate::error::{DbError, Result};
use crate::executor::execute;
use crate::query::{Query, ResultSet, Row};

/// Stream the rows of `query` one at a time, fetched incrementally from a
/// single held-open cursor.
pub fn stream_rows(path: impl Into<PathBuf>, query: Query) -> impl Stream<Item = Row> {
    let path = path.into();
    let (mut tx, rx) = mpsc::channel::<Row>(1);

    tokio::spawn(async move {
        let mut conn = match connect(&path).await {
            Ok(conn) => conn,
            Err(err) => {
                warn!(error = %err, "row stream could not open a connection");
                return;
            }
        };

        {
            let mut q = sqlx::query(query.text());
            for param in query.params() {
                q = param.bind_to(q);
            }
            let mut cursor = q.fetch(&mut conn);

            while let Some(fetched) = cursor.next().await {
                let row = match fetched
                    .map_err(DbError::from_sqlx)
                    .and_then(|raw| Row::from_sqlite(&raw))
                {
                    Ok(row) => row,
                    Err(err) => {
                        warn!(error = %err, "row stream terminated early after fetch error");
                        break;
                    }
                };

                if tx.send(row).await.is_err() {
                    debug!("row stream abandoned by consumer, releasing cursor");
                    break;
                }
            }
        }

        let _ = conn.close().await;
    });

    rx
}

/// Stream the rows of `query` in chunks of up to `batch_size`, yielding each
/// non-empty batch and terminating at exhaustion. Batches preserve the
/// store's natural row order; boundaries carry no meaning beyond chunking.
///
/// Fails with [`DbError::InvalidArgument`] before any store access when
/// `batch_size` is zero.
pub fn stream_batches(
    path: impl Into<PathBuf>,
    query: Query,
    batch_size: usize,
) -> Result<impl Stream<Item = Vec<Row>>> {
    if batch_size < 1 {
        return Err(DbError::invalid_argument("batch_size must be >= 1"));
    }
    Ok(stream_rows(path, query).chunks(batch_size))
}

/// Stream successive pages of `query`, each fetched by an INDEPENDENT
/// `LIMIT ? OFFSET ?` statement on a fresh connection — no held-open cursor,
/// trading round-trip overhead for immunity to long-lived cursor
/// invalidation. The internal offset starts at 0 and advances by
/// `page_size` after each non-empty page; the first empty page ends the
/// stream.
///
/// Fails with [`DbError::InvalidArgument`] before any store access when
/// `page_size` is zero.
pub fn stream_pages(
    path: impl Into<PathBuf>,
    query: Query,
    page_size: usize,
) -> Result<impl Stream<Item = Vec<Row>>> {
    if page_size < 1 {
        return Err(DbError::invalid_argument("page_size must be >= 1"));
    }

    let path = path.into();
    Ok(futures::stream::unfold(0usize, move |offset| {
        let path = path.clone();
        let query = query.clone();
        async move {
            match fetch_page(&path, &query, page_size, offset).await {
                Ok(page) if page.is_empty() => None,
                Ok(page) => Some((page, offset + page_size)),
                Err(err) => {
                    warn!(error = %err, offset, "page stream terminated early after fetch error");
                    None
                }
            }
        }
    }))
}

/// Run one bounded range query on its own connection, releasing the
/// connection on both success and failure.
async fn fetch_page(
    path: &Path,
    base: &Query,
    page_size: usize,
    offset: usize,
) -> Result<ResultSet> {
    let mut paged = Query::new(format!(
        "{} LIMIT ? OFFSET ?",
        base.text().trim().trim_end_matches(';')
    ));
    for param in base.params() {
        paged = paged.bind(param.clone());
    }
    paged = paged.bind(page_size as i64).bind(offset as i64);

    let mut conn = connect(path).await?;
    let result = execute(&mut conn, &paged).await;
    let _ = conn.close().await;
    result
}
