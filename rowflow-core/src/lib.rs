//! rowflow-core: resource-managed, lazily-streaming access to a SQLite
//! store.
//!
//! The crate is organized as a small executor plus a stack of composable
//! wrappers over it:
//!
//! - [`connection`] — scoped acquisition: commit on success, rollback on
//!   failure, close always.
//! - [`executor`] — run one parameterized statement, materialize its rows.
//! - [`retry`] / [`cache`] / [`log`] — cross-cutting decorators layered
//!   over any executor call.
//! - [`stream`] — lazy row / batch / page streams that never hold the full
//!   result set in memory.
//! - [`aggregate`] — online aggregation over scalar streams.
//! - [`concurrent`] — cooperative two-way fetch with a join barrier.

pub mod aggregate;
pub mod cache;
pub mod concurrent;
pub mod config;
pub mod connection;
pub mod error;
pub mod executor;
pub mod log;
pub mod query;
pub mod retry;
pub mod stream;

pub use aggregate::{average_age, mean_of, stream_ages};
pub use cache::{cache_key, QueryCache};
pub use concurrent::fetch_both;
pub use config::{RetryConfig, RowflowConfig};
pub use connection::{connect, with_connection};
pub use error::{DbError, Result};
pub use executor::execute;
pub use log::logged;
pub use query::{looks_like_sql, Query, ResultSet, Row, Value};
pub use retry::with_retry;
pub use stream::{stream_batches, stream_pages, stream_rows};
