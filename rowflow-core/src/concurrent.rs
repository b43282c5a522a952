//! Concurrent fetch orchestration.
//!
//! Two independent fetch operations make forward progress by yielding at
//! their I/O boundaries within one task — cooperative interleaving, not
//! parallel threads. The join barrier releases only once both have settled;
//! a failure on one side neither cancels nor masks the other, because each
//! outcome stays its own `Result`. Each operation is expected to open its
//! own connection; nothing is shared between them.
//!
//! There is no cancellation or timeout here: once started, an operation
//! runs to completion or failure.

use std::future::Future;

use crate::error::Result;

/// Run both operations concurrently and pair their outcomes positionally.
/// Either may complete first; the pair is returned only after both settle.
pub async fn fetch_both<A, B, FutA, FutB>(op_a: FutA, op_b: FutB) -> (Result<A>, Result<B>)
where
    FutA: Future<Output = Result<A>>,
    FutB: Future<Output = Result<B>>,
{
    tokio::join!(op_a, op_b)
}
