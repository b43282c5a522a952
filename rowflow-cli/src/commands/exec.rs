//! Run one SQL statement through the full decorator stack:
//! logged → cached → retry → scoped connection → executor.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use futures::FutureExt;
use rowflow_core::{
    execute, logged, with_connection, with_retry, Query, QueryCache, RetryConfig, Value,
};

#[derive(Parser, Debug)]
pub struct ExecArgs {
    /// SQL statement with ?-style positional placeholders
    pub sql: String,

    /// Bind value for the next placeholder (repeatable, in order).
    /// Integers and reals are detected; everything else binds as text.
    #[arg(long = "param", value_name = "VALUE")]
    pub params: Vec<String>,

    /// Route the statement through the process-wide query cache
    #[arg(long)]
    pub cached: bool,

    /// Total attempts, including the first (overrides config)
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Fixed delay between attempts in milliseconds (overrides config)
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,
}

fn parse_param(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        Value::Integer(i)
    } else if let Ok(f) = raw.parse::<f64>() {
        Value::Real(f)
    } else {
        Value::Text(raw.to_string())
    }
}

pub async fn run(db: &Path, args: ExecArgs, retry: RetryConfig) -> Result<()> {
    let mut query = Query::new(args.sql);
    for raw in &args.params {
        query = query.bind(parse_param(raw));
    }

    let max_attempts = args.retries.unwrap_or(retry.max_attempts);
    let delay = Duration::from_millis(args.delay_ms.unwrap_or(retry.delay_ms));

    // Each attempt acquires a fresh scope: a connection-level failure on
    // one attempt never poisons the next.
    let attempt = || {
        let query = query.clone();
        let db = db.to_path_buf();
        async move {
            with_connection(&db, move |conn| {
                async move { execute(conn, &query).await }.boxed()
            })
            .await
        }
    };

    let rows = if args.cached {
        let cache = QueryCache::global();
        logged(&query, || {
            cache.cached(&query, || with_retry(max_attempts, delay, attempt))
        })
        .await?
    } else {
        logged(&query, || with_retry(max_attempts, delay, attempt)).await?
    };

    for row in &rows {
        println!("{}", serde_json::to_string(&row.to_json())?);
    }
    println!("({} rows)", rows.len());
    Ok(())
}
