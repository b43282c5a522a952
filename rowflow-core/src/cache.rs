//! Result cache keyed by literal statement text.
//!
//! The key is the trimmed statement text and nothing else — bound
//! parameters are deliberately excluded. That means a statement run twice
//! with identical text but different parameters returns the FIRST
//! execution's rows on every subsequent call. This is the documented
//! contract of the cache, not an oversight; callers who need per-parameter
//! results must not route through it.
//!
//! The process-wide instance is unbounded and never expires: created at
//! process start, cleared only by an explicit [`QueryCache::reset`] or
//! process exit. Production deployments would want eviction; this layer
//! intentionally has none.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use tracing::{debug, info};

use crate::error::Result;
use crate::query::{Query, ResultSet};

static GLOBAL_CACHE: Lazy<QueryCache> = Lazy::new(QueryCache::new);

/// Mapping from trimmed statement text to a previously computed result set.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<String, ResultSet>>,
}

/// Statement verbs eligible for caching. Narrower than the logger's
/// recognizer: only read-shaped statements are keyed. A mutation routed
/// through the cache would run once and be skipped on every later
/// identical invocation, so INSERT/UPDATE/DELETE and DDL never cache.
const CACHEABLE_VERBS: &[&str] = &["SELECT", "WITH"];

/// Derive the cache key for a query: its trimmed text, provided the text
/// starts with SELECT or WITH (case-insensitive). Returns `None` for
/// everything else — such calls execute uncached every time.
pub fn cache_key(query: &Query) -> Option<String> {
    let text = query.text().trim();
    CACHEABLE_VERBS
        .iter()
        .any(|verb| {
            text.get(..verb.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(verb))
        })
        .then(|| text.to_string())
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache instance.
    pub fn global() -> &'static QueryCache {
        &GLOBAL_CACHE
    }

    /// Memoize `op` under the query's derived key.
    ///
    /// Hit: return the stored result set, no store round trip. Miss: run
    /// `op`, store its result, return it. Underivable key: run `op`
    /// uncached. Errors from `op` are never stored.
    pub async fn cached<F, Fut>(&self, query: &Query, op: F) -> Result<ResultSet>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ResultSet>>,
    {
        let Some(key) = cache_key(query) else {
            debug!("no SQL text derived from arguments, executing uncached");
            return op().await;
        };

        if let Some(hit) = self.entries.lock().unwrap().get(&key).cloned() {
            info!(query = %key, "cache hit");
            return Ok(hit);
        }

        info!(query = %key, "cache miss, executing and caching");
        let rows = op().await?;
        self.entries.lock().unwrap().insert(key, rows.clone());
        Ok(rows)
    }

    /// Administrative reset: drop every entry. The only invalidation this
    /// cache supports.
    pub fn reset(&self) {
        self.entries.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
