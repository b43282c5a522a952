//! Shared scaffolding: a scratch SQLite database seeded with user_data rows.
#![allow(dead_code)] // not every test binary uses every helper

use std::path::PathBuf;

use futures::FutureExt;
use rowflow_core::{execute, with_connection, Query};
use tempfile::TempDir;

/// Create a temp database with a `user_data` table holding one row per age.
/// Returns the TempDir guard alongside the database path; dropping the
/// guard removes the database.
pub async fn seed_users(ages: &[i64]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("users.db");

    let ages = ages.to_vec();
    with_connection(&path, move |conn| {
        async move {
            execute(
                conn,
                &Query::new(
                    "CREATE TABLE user_data (
                        user_id TEXT PRIMARY KEY,
                        name TEXT NOT NULL,
                        email TEXT NOT NULL,
                        age INTEGER NOT NULL
                    )",
                ),
            )
            .await?;

            for (i, age) in ages.iter().enumerate() {
                execute(
                    conn,
                    &Query::new(
                        "INSERT INTO user_data (user_id, name, email, age) VALUES (?, ?, ?, ?)",
                    )
                    .bind(format!("user-{i}"))
                    .bind(format!("User {i}"))
                    .bind(format!("user{i}@example.com"))
                    .bind(*age),
                )
                .await?;
            }

            Ok(())
        }
        .boxed()
    })
    .await
    .expect("seeding scratch database");

    (dir, path)
}

/// Count the rows currently committed to user_data.
pub async fn count_users(path: &std::path::Path) -> i64 {
    let path = path.to_path_buf();
    with_connection(&path, |conn| {
        async move {
            let rows = execute(conn, &Query::new("SELECT COUNT(*) AS n FROM user_data")).await?;
            Ok(match rows[0].get("n") {
                Some(rowflow_core::Value::Integer(n)) => *n,
                _ => 0,
            })
        }
        .boxed()
    })
    .await
    .expect("counting rows")
}
