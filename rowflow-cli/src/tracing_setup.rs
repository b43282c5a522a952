//! Tracing setup for the rowflow CLI.
//!
//! Usage:
//!   rowflow --debug ...              # Debug logging to console
//!   rowflow --quiet ...              # Errors only
//!   RUST_LOG=rowflow=debug rowflow   # Fine-grained log control

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Initialize console tracing. `debug` bumps the default level, `quiet`
/// drops everything below errors; an explicit RUST_LOG wins over both.
pub fn init(debug: bool, quiet: bool) -> Result<()> {
    let default_level = if debug {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
