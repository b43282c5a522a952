//! rowflow CLI - resource-managed, lazily-streaming access to a SQLite
//! store.
//!
//! Subcommands map onto the core building blocks:
//! - `seed` provisions the user_data table from a CSV
//! - `exec` runs one statement through the decorator stack (log/cache/retry)
//! - `rows`, `batches`, `pages` demonstrate the lazy stream family
//! - `mean` computes the average age online, in O(1) memory
//! - `both` fetches two result sets concurrently on independent connections

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rowflow_core::RowflowConfig;

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "rowflow",
    author,
    version,
    about = "Scoped connections, query decorators, and lazy row streams over SQLite"
)]
struct Cli {
    /// Path to the SQLite database (overrides the config file)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Suppress diagnostic output (errors still print)
    #[arg(long, global = true, conflicts_with = "debug")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Provision the user_data table from a CSV file (idempotent)
    Seed(commands::seed::SeedArgs),
    /// Execute one SQL statement through the decorator stack
    Exec(commands::exec::ExecArgs),
    /// Stream users one row at a time
    Rows(commands::stream::RowsArgs),
    /// Stream users in fixed-size batches, filtering by age
    Batches(commands::stream::BatchesArgs),
    /// Stream users page by page via independent offset queries
    Pages(commands::stream::PagesArgs),
    /// Average age via online aggregation over a lazy scalar stream
    Mean,
    /// Fetch all users and users over a threshold concurrently
    Both(commands::both::BothArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_setup::init(cli.debug, cli.quiet)?;

    let config = RowflowConfig::load()?;
    let db = cli.db.unwrap_or_else(|| config.database.clone());

    match cli.command {
        Commands::Seed(args) => commands::seed::run(&db, args, config.seed_csv.clone()).await,
        Commands::Exec(args) => commands::exec::run(&db, args, config.retry.clone()).await,
        Commands::Rows(args) => commands::stream::rows(&db, args).await,
        Commands::Batches(args) => commands::stream::batches(&db, args, config.batch_size).await,
        Commands::Pages(args) => commands::stream::pages(&db, args, config.page_size).await,
        Commands::Mean => commands::stream::mean(&db).await,
        Commands::Both(args) => commands::both::run(&db, args).await,
    }
}
