//! Environment-driven configuration.
//!
//! | Variable          | Meaning                                  | Default     |
//! |-------------------|------------------------------------------|-------------|
//! | `DATABASE_URL`    | database to seed and benchmark           | required    |
//! | `PERF_SEED_ROWS`  | rows written by `seed`                   | 2,000,000   |
//! | `PERF_ITERATIONS` | timed iterations per scenario            | 10          |
//! | `PERF_LOG`        | stderr log level                         | `info`      |
//! | `PERF_LOG_FILE`   | optional log file (receives every level) | unset       |
//!
//! A `.env` file in the working directory is loaded first when present.

use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use perf_core::constants::{DEFAULT_ITERATIONS, SEED_ROW_COUNT};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub database_url: String,
    pub seed_rows: u64,
    pub iterations: u32,
    pub log_level: LevelFilter,
    pub log_file: Option<String>,
}

impl BenchConfig {
    /// Read the configuration from the process environment (after `.env`).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| anyhow!("DATABASE_URL is not set"))?;

        Ok(Self {
            database_url,
            seed_rows: parse_or(&lookup, "PERF_SEED_ROWS", SEED_ROW_COUNT)?,
            iterations: parse_or(&lookup, "PERF_ITERATIONS", DEFAULT_ITERATIONS)?,
            log_level: lookup("PERF_LOG")
                .map(|level| perf_core::parse_level(&level))
                .unwrap_or(LevelFilter::Info),
            log_file: lookup("PERF_LOG_FILE").filter(|path| !path.is_empty()),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .replace('_', "")
            .parse()
            .with_context(|| format!("invalid {key}: {raw:?}")),
        None => Ok(default),
    }
}
