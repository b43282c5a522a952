//! Database provisioning: create the user_data table and ingest a CSV.
//!
//! Malformed rows (missing name/email/age, or a non-numeric age) are
//! skipped with a diagnostic — a bad line never aborts the load. The load
//! is idempotent: an already-populated table is left alone.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use futures::FutureExt;
use rowflow_core::{execute, with_connection, Query, Value};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// CSV file with user_id,name,email,age columns (header row required)
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

struct CsvUser {
    user_id: String,
    name: String,
    email: String,
    age: i64,
}

pub async fn run(db: &Path, args: SeedArgs, default_csv: Option<PathBuf>) -> Result<()> {
    let csv_path = args
        .csv
        .or(default_csv)
        .context("no CSV file given; pass --csv or set seed_csv in the config")?;

    let content = fs::read_to_string(&csv_path)
        .with_context(|| format!("failed to read CSV at {:?}", csv_path))?;
    let users = parse_users(&content);

    let inserted = with_connection(db, move |conn| {
        async move {
            execute(
                conn,
                &Query::new(
                    "CREATE TABLE IF NOT EXISTS user_data (
                        user_id TEXT PRIMARY KEY,
                        name TEXT NOT NULL,
                        email TEXT NOT NULL,
                        age INTEGER NOT NULL
                    )",
                ),
            )
            .await?;

            let rows = execute(conn, &Query::new("SELECT COUNT(*) AS n FROM user_data")).await?;
            let existing = match rows.first().and_then(|r| r.get("n")) {
                Some(Value::Integer(n)) => *n,
                _ => 0,
            };
            if existing > 0 {
                info!(existing, "user_data already populated, skipping load");
                return Ok(0usize);
            }

            let mut inserted = 0usize;
            for user in &users {
                execute(
                    conn,
                    &Query::new(
                        "INSERT INTO user_data (user_id, name, email, age) VALUES (?, ?, ?, ?)",
                    )
                    .bind(user.user_id.as_str())
                    .bind(user.name.as_str())
                    .bind(user.email.as_str())
                    .bind(user.age),
                )
                .await?;
                inserted += 1;
            }
            Ok(inserted)
        }
        .boxed()
    })
    .await?;

    println!("Seeded {} records into user_data", inserted);
    Ok(())
}

/// Parse CSV content into well-formed users, skipping malformed lines.
fn parse_users(content: &str) -> Vec<CsvUser> {
    let mut lines = content.lines();
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let col = |name: &str| columns.iter().position(|c| c.eq_ignore_ascii_case(name));
    let (id_col, name_col, email_col, age_col) =
        (col("user_id"), col("name"), col("email"), col("age"));

    let mut users = Vec::new();
    for (lineno, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let field = |idx: Option<usize>| idx.and_then(|i| fields.get(i)).copied().unwrap_or("");

        let name = field(name_col);
        let email = field(email_col);
        let age_raw = field(age_col);
        if name.is_empty() || email.is_empty() || age_raw.is_empty() {
            warn!(line = lineno + 2, "skipping incomplete record");
            continue;
        }
        // Ages arrive as "30" or "30.0" depending on the export.
        let Ok(age) = age_raw.parse::<f64>() else {
            warn!(line = lineno + 2, name, age = age_raw, "skipping record with non-numeric age");
            continue;
        };

        // Generate an id when the column is absent or not a valid UUID.
        let raw_id = field(id_col);
        let user_id = if Uuid::parse_str(raw_id).is_ok() {
            raw_id.to_string()
        } else {
            Uuid::new_v4().to_string()
        };

        users.push(CsvUser {
            user_id,
            name: name.to_string(),
            email: email.to_string(),
            age: age as i64,
        });
    }
    users
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_rows() {
        let csv = "user_id,name,email,age\n\
                   00000000-0000-0000-0000-000000000001,Ada,ada@example.com,36\n\
                   ,Grace,grace@example.com,45.0\n";
        let users = parse_users(csv);

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].user_id, "00000000-0000-0000-0000-000000000001");
        assert_eq!(users[0].age, 36);
        // Missing id gets generated.
        assert!(Uuid::parse_str(&users[1].user_id).is_ok());
        assert_eq!(users[1].age, 45);
    }

    #[test]
    fn malformed_id_is_regenerated() {
        // 36 characters, but not a UUID.
        let csv = "user_id,name,email,age\n\
                   ------------------------------------,Ada,ada@example.com,36\n";
        let users = parse_users(csv);

        assert_eq!(users.len(), 1);
        assert_ne!(users[0].user_id, "------------------------------------");
        assert!(Uuid::parse_str(&users[0].user_id).is_ok());
    }

    #[test]
    fn skips_malformed_rows() {
        let csv = "user_id,name,email,age\n\
                   ,Ada,,36\n\
                   ,Grace,grace@example.com,not-a-number\n\
                   ,,bob@example.com,20\n\
                   ,Joan,joan@example.com,52\n";
        let users = parse_users(csv);

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Joan");
    }

    #[test]
    fn empty_input_parses_to_nothing() {
        assert!(parse_users("").is_empty());
        assert!(parse_users("user_id,name,email,age\n").is_empty());
    }
}
