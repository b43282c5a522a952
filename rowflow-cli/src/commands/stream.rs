//! Streaming demos: rows one by one, fixed-size batches with a filter,
//! lazy offset pagination, and the online mean.

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use futures::StreamExt;
use rowflow_core::{average_age, stream_batches, stream_pages, stream_rows, Query, Value};

const USERS_QUERY: &str = "SELECT user_id, name, email, age FROM user_data";

#[derive(Parser, Debug)]
pub struct RowsArgs {
    /// Stop after this many rows (0 = no limit)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,
}

#[derive(Parser, Debug)]
pub struct BatchesArgs {
    /// Rows per batch (defaults to the configured batch_size)
    #[arg(long, value_name = "N")]
    pub size: Option<usize>,

    /// Only print users strictly older than this
    #[arg(long, default_value_t = 25)]
    pub min_age: i64,
}

#[derive(Parser, Debug)]
pub struct PagesArgs {
    /// Rows per page (defaults to the configured page_size)
    #[arg(long, value_name = "N")]
    pub size: Option<usize>,
}

pub async fn rows(db: &Path, args: RowsArgs) -> Result<()> {
    let mut stream = stream_rows(db, Query::new(USERS_QUERY));
    let mut printed = 0usize;

    while let Some(row) = stream.next().await {
        println!("{}", serde_json::to_string(&row.to_json())?);
        printed += 1;
        if args.limit > 0 && printed >= args.limit {
            break;
        }
    }

    println!("({} rows streamed)", printed);
    Ok(())
}

pub async fn batches(db: &Path, args: BatchesArgs, default_size: usize) -> Result<()> {
    let size = args.size.unwrap_or(default_size);
    let mut stream = stream_batches(db, Query::new(USERS_QUERY), size)?;

    let mut batch_count = 0usize;
    let mut matched = 0usize;
    while let Some(batch) = stream.next().await {
        batch_count += 1;
        for row in &batch {
            let age = row.get("age").and_then(Value::as_f64).unwrap_or(0.0);
            if age > args.min_age as f64 {
                println!("{}", serde_json::to_string(&row.to_json())?);
                matched += 1;
            }
        }
    }

    println!(
        "({} users over {} across {} batches of up to {})",
        matched, args.min_age, batch_count, size
    );
    Ok(())
}

pub async fn pages(db: &Path, args: PagesArgs, default_size: usize) -> Result<()> {
    let size = args.size.unwrap_or(default_size);
    let stream = stream_pages(db, Query::new(USERS_QUERY), size)?;
    futures::pin_mut!(stream);

    let mut page_no = 0usize;
    while let Some(page) = stream.next().await {
        page_no += 1;
        println!("-- page {} ({} rows)", page_no, page.len());
        for row in &page {
            println!("{}", serde_json::to_string(&row.to_json())?);
        }
    }

    println!("({} pages of up to {})", page_no, size);
    Ok(())
}

pub async fn mean(db: &Path) -> Result<()> {
    let mean = average_age(db).await;
    println!("Average age of users: {}", mean);
    Ok(())
}
