//! Online aggregation over lazy scalar streams.
//!
//! Consumes a stream exactly once, holding only a running sum and count —
//! O(1) auxiliary memory regardless of how many rows the source has.

use std::path::PathBuf;

use futures::{Stream, StreamExt};

use crate::query::{Query, Value};
use crate::stream::stream_rows;

/// Mean of a lazy numeric stream. An empty stream yields 0, not an error.
pub async fn mean_of<S>(stream: S) -> f64
where
    S: Stream<Item = f64>,
{
    let (sum, count) = stream
        .fold((0.0f64, 0u64), |(sum, count), v| async move {
            (sum + v, count + 1)
        })
        .await;

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Scalar projection of the `age` column, one value at a time. Rows whose
/// first cell has no numeric view are skipped.
pub fn stream_ages(path: impl Into<PathBuf>) -> impl Stream<Item = f64> {
    stream_rows(path, Query::new("SELECT age FROM user_data")).filter_map(|row| async move {
        row.at(0).and_then(Value::as_f64)
    })
}

/// Average age of the user_data table without materializing the column.
pub async fn average_age(path: impl Into<PathBuf>) -> f64 {
    mean_of(stream_ages(path)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[tokio::test]
    async fn mean_of_empty_stream_is_zero() {
        let mean = mean_of(stream::iter(Vec::<f64>::new())).await;
        assert_eq!(mean, 0.0);
    }

    #[tokio::test]
    async fn mean_of_three_values() {
        let mean = mean_of(stream::iter(vec![10.0, 20.0, 30.0])).await;
        assert!((mean - 20.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn mean_matches_materialized_computation() {
        let values: Vec<f64> = (1..=1000).map(f64::from).collect();
        let materialized = values.iter().sum::<f64>() / values.len() as f64;

        let online = mean_of(stream::iter(values)).await;
        assert!((online - materialized).abs() < 1e-9);
    }
}
