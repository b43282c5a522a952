//! Configuration for the rowflow tools.
//!
//! Loaded from `~/.rowflow/config.toml` when present; every field has a
//! working default so the CLI runs without any config file at all.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowflowConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// CSV file used by the seed command when no --csv flag is given
    pub seed_csv: Option<PathBuf>,

    #[serde(default)]
    pub retry: RetryConfig,

    /// Default chunk size for the batch stream
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Default page size for lazy pagination
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Fixed delay between attempts, in milliseconds
    pub delay_ms: u64,
}

fn default_database() -> PathBuf {
    PathBuf::from("users.db")
}

fn default_batch_size() -> usize {
    50
}

fn default_page_size() -> usize {
    100
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1000,
        }
    }
}

impl Default for RowflowConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            seed_csv: None,
            retry: RetryConfig::default(),
            batch_size: default_batch_size(),
            page_size: default_page_size(),
        }
    }
}

impl RowflowConfig {
    /// Path to the config file: ~/.rowflow/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rowflow")
            .join("config.toml")
    }

    /// Load config from the default location, falling back to defaults when
    /// the file does not exist. A file that exists but fails to parse is an
    /// error, not a silent fallback.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load config from an explicit path (missing file → defaults).
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config at {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("failed to parse config at {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = RowflowConfig::load_from("/nonexistent/rowflow.toml").unwrap();
        assert_eq!(cfg.database, PathBuf::from("users.db"));
        assert_eq!(cfg.retry.max_attempts, 3);
        assert_eq!(cfg.batch_size, 50);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "database = \"/tmp/test.db\"").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "[retry]").unwrap();
        writeln!(file, "max_attempts = 5").unwrap();
        writeln!(file, "delay_ms = 250").unwrap();
        file.flush().unwrap();

        let cfg = RowflowConfig::load_from(file.path()).unwrap();
        assert_eq!(cfg.database, PathBuf::from("/tmp/test.db"));
        assert_eq!(cfg.retry.max_attempts, 5);
        assert_eq!(cfg.retry.delay_ms, 250);
        assert_eq!(cfg.page_size, 100);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "database = [not toml").unwrap();
        file.flush().unwrap();

        assert!(RowflowConfig::load_from(file.path()).is_err());
    }
}
