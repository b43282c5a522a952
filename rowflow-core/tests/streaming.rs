//! Lazy stream behavior against a real store: ordering, chunking shapes,
//! pagination shapes, single-pass semantics, abandonment, and the
//! end-to-end aggregation pipeline.

mod common;

use futures::{FutureExt, StreamExt};
use rowflow_core::{
    average_age, execute, stream_batches, stream_pages, stream_rows, with_connection, DbError,
    Query, Value,
};

use common::seed_users;

fn users_query() -> Query {
    Query::new("SELECT user_id, name, email, age FROM user_data ORDER BY user_id")
}

#[tokio::test]
async fn row_stream_yields_rows_one_at_a_time_in_order() {
    let (_dir, path) = seed_users(&[21, 22, 23]).await;

    let rows: Vec<_> = stream_rows(&path, users_query()).collect().await;

    assert_eq!(rows.len(), 3);
    let ages: Vec<&Value> = rows.iter().filter_map(|r| r.get("age")).collect();
    assert_eq!(
        ages,
        vec![&Value::Integer(21), &Value::Integer(22), &Value::Integer(23)]
    );
}

#[tokio::test]
async fn exhausted_stream_stays_exhausted() {
    let (_dir, path) = seed_users(&[30]).await;

    let mut stream = stream_rows(&path, users_query());
    assert!(stream.next().await.is_some());
    assert!(stream.next().await.is_none());
    // Re-polling an exhausted stream yields no further elements.
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn batches_of_three_over_seven_rows() {
    let (_dir, path) = seed_users(&[1, 2, 3, 4, 5, 6, 7]).await;

    let batches: Vec<Vec<_>> = stream_batches(&path, users_query(), 3)
        .unwrap()
        .collect()
        .await;

    let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![3, 3, 1]);
}

#[tokio::test]
async fn batch_size_zero_fails_before_store_access() {
    // Path is never touched: a bogus location must not matter.
    let result = stream_batches("/nonexistent/users.db", users_query(), 0);
    assert!(matches!(
        result.map(|_| ()),
        Err(DbError::InvalidArgument { .. })
    ));
}

#[tokio::test]
async fn pages_of_five_over_twelve_rows() {
    let ages: Vec<i64> = (1..=12).collect();
    let (_dir, path) = seed_users(&ages).await;

    let pages: Vec<Vec<_>> = stream_pages(&path, users_query(), 5)
        .unwrap()
        .collect()
        .await;

    let sizes: Vec<usize> = pages.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![5, 5, 2]);
}

#[tokio::test]
async fn page_size_zero_fails_before_store_access() {
    let result = stream_pages("/nonexistent/users.db", users_query(), 0);
    assert!(matches!(
        result.map(|_| ()),
        Err(DbError::InvalidArgument { .. })
    ));
}

#[tokio::test]
async fn page_stream_over_empty_table_yields_nothing() {
    let (_dir, path) = seed_users(&[]).await;

    let pages: Vec<Vec<_>> = stream_pages(&path, users_query(), 5)
        .unwrap()
        .collect()
        .await;
    assert!(pages.is_empty());
}

#[tokio::test]
async fn abandoned_stream_releases_its_connection() {
    let ages: Vec<i64> = (0..100).collect();
    let (_dir, path) = seed_users(&ages).await;

    {
        let mut stream = stream_rows(&path, users_query());
        assert!(stream.next().await.is_some());
        assert!(stream.next().await.is_some());
        // Drop with 98 rows unconsumed.
    }

    // Give the producer a moment to observe the abandonment, then verify a
    // writer can get in: the cursor's shared lock must be gone.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    with_connection(&path, |conn| {
        async move {
            execute(
                conn,
                &Query::new("INSERT INTO user_data (user_id, name, email, age) VALUES (?, ?, ?, ?)")
                    .bind("late")
                    .bind("Late Arrival")
                    .bind("late@example.com")
                    .bind(99i64),
            )
            .await
        }
        .boxed()
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn fetch_error_terminates_stream_early() {
    let (_dir, path) = seed_users(&[1]).await;

    // Query against a missing table: the stream surfaces nothing and ends.
    let rows: Vec<_> = stream_rows(&path, Query::new("SELECT * FROM no_such_table"))
        .collect()
        .await;
    assert!(rows.is_empty());
}

#[tokio::test]
async fn end_to_end_average_age() {
    let (_dir, path) = seed_users(&[20, 30, 40, 50, 60]).await;

    let mean = average_age(&path).await;
    assert!((mean - 40.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn average_age_of_empty_table_is_zero() {
    let (_dir, path) = seed_users(&[]).await;
    assert_eq!(average_age(&path).await, 0.0);
}
