//! Standalone runner: seeds the database and/or runs the scenario suite,
//! printing one raw timing line per iteration on stdout.
//!
//! Usage:
//!   layout-bench seed
//!   layout-bench bench [filter]
//!   layout-bench all [filter]
//!
//! `seed` and `all` refuse a database whose `perf` table already has rows.
//! Progress markers go to stderr, so stdout carries only timing lines.
//!
//! Configuration comes from the environment, see [`layout_bench::config`].

use anyhow::{bail, Context, Result};
use layout_bench::config::BenchConfig;
use layout_bench::runner::run_suite;
use layout_bench::schema::{open_connection, row_count};
use layout_bench::seed::seed;
use layout_bench::suite::select_scenarios;
use perf_core::constants::SEED_TABLE;
use std::{env, io, process};

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Seed,
    Bench { filter: Option<String> },
    All { filter: Option<String> },
}

impl Command {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let command = args.next();
        let filter = args.next();
        if let Some(extra) = args.next() {
            bail!("unexpected argument {extra:?}");
        }
        match (command.as_deref(), filter) {
            (Some("seed"), None) => Ok(Command::Seed),
            (Some("bench"), filter) => Ok(Command::Bench { filter }),
            (Some("all"), filter) => Ok(Command::All { filter }),
            (Some(other), _) => bail!("unknown command {other:?}"),
            (None, _) => bail!("missing command"),
        }
    }
}

fn run(command: Command, config: &BenchConfig) -> Result<()> {
    let conn = open_connection(&config.database_url)?;
    log::info!("connected to {}", config.database_url);

    let filter = match command {
        Command::Seed => {
            seed(&conn, config.seed_rows)?;
            return Ok(());
        }
        Command::All { filter } => {
            seed(&conn, config.seed_rows)?;
            filter
        }
        Command::Bench { filter } => {
            let rows = row_count(&conn, SEED_TABLE).with_context(|| {
                format!("{SEED_TABLE} is missing, run `layout-bench seed` first")
            })?;
            log::info!("{SEED_TABLE} holds {rows} rows");
            filter
        }
    };

    let scenarios = select_scenarios(filter.as_deref());
    if scenarios.is_empty() {
        bail!("no scenario matches {:?}", filter.unwrap_or_default());
    }
    let stdout = io::stdout();
    run_suite(&conn, &scenarios, config.iterations, &mut stdout.lock())?;
    Ok(())
}

/// Why the process could not get as far as running a command.
#[derive(Debug)]
enum StartupError {
    Usage(anyhow::Error),
    Config(anyhow::Error),
}

/// Parse the arguments, then load the configuration. Bad arguments are
/// reported before a missing or malformed environment.
fn startup(
    args: impl Iterator<Item = String>,
    load_config: impl FnOnce() -> Result<BenchConfig>,
) -> std::result::Result<(Command, BenchConfig), StartupError> {
    let command = Command::parse(args).map_err(StartupError::Usage)?;
    let config = load_config().map_err(StartupError::Config)?;
    Ok((command, config))
}

fn main() {
    let (command, config) = match startup(env::args().skip(1), BenchConfig::from_env) {
        Ok(started) => started,
        Err(StartupError::Usage(e)) => {
            eprintln!("{e}");
            eprintln!("usage: layout-bench <seed | bench [filter] | all [filter]>");
            process::exit(2);
        }
        Err(StartupError::Config(e)) => {
            eprintln!("Invalid configuration: {e:#}");
            process::exit(1);
        }
    };

    perf_core::initialize_logger(config.log_level, config.log_file.as_deref()).unwrap_or_else(
        |e| {
            eprintln!("Failed to initialize logger: {e:#}. Exiting.");
            process::exit(1);
        },
    );

    if let Err(e) = run(command, &config) {
        log::error!("{e:#}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command> {
        Command::parse(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse(&["seed"]).unwrap(), Command::Seed);
        assert_eq!(parse(&["bench"]).unwrap(), Command::Bench { filter: None });
        assert_eq!(
            parse(&["all", "read"]).unwrap(),
            Command::All {
                filter: Some("read".into())
            }
        );
    }

    fn args(args: &[&str]) -> impl Iterator<Item = String> {
        args.iter().map(|a| a.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn usage_is_reported_before_configuration() {
        let result = startup(args(&[]), || BenchConfig::from_lookup(|_| None));
        assert!(matches!(result, Err(StartupError::Usage(_))));
    }

    #[test]
    fn configuration_is_checked_after_valid_arguments() {
        let result = startup(args(&["bench"]), || BenchConfig::from_lookup(|_| None));
        assert!(matches!(result, Err(StartupError::Config(_))));

        let (command, config) = startup(args(&["seed"]), || {
            BenchConfig::from_lookup(|key| (key == "DATABASE_URL").then(|| ":memory:".to_string()))
        })
        .unwrap();
        assert_eq!(command, Command::Seed);
        assert_eq!(config.database_url, ":memory:");
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["seed", "extra"]).is_err());
        assert!(parse(&["bench", "a", "b"]).is_err());
        assert!(parse(&["drop"]).is_err());
    }
}
