//! Drives scenarios: setup → timed iterations → teardown.

use crate::report::{write_raw, ScenarioTimings};
use crate::suite::Scenario;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::io::Write;
use std::time::Instant;

/// Run one scenario for `iterations` timed iterations.
///
/// The first failing iteration ends the run: teardown is still attempted and
/// the iteration's error is returned.
pub fn run_scenario(
    conn: &Connection,
    scenario: &dyn Scenario,
    iterations: u32,
) -> Result<ScenarioTimings> {
    let name = scenario.name();
    scenario
        .setup(conn)
        .with_context(|| format!("{name}: setup failed"))?;

    let mut timings = ScenarioTimings::new(name, iterations as usize);
    for i in 0..i64::from(iterations) {
        let start = Instant::now();
        if let Err(err) = scenario.run(conn, i) {
            if let Err(teardown_err) = scenario.teardown(conn) {
                log::warn!("{name}: teardown after failure also failed: {teardown_err:#}");
            }
            return Err(err.context(format!("{name}: iteration {i} failed")));
        }
        timings.push(start.elapsed());
    }

    scenario
        .teardown(conn)
        .with_context(|| format!("{name}: teardown failed"))?;
    Ok(timings)
}

/// Run `scenarios` in order, writing raw timings to `out` as each finishes.
pub fn run_suite(
    conn: &Connection,
    scenarios: &[Box<dyn Scenario>],
    iterations: u32,
    out: &mut impl Write,
) -> Result<Vec<ScenarioTimings>> {
    let total = scenarios.len();
    let mut results = Vec::with_capacity(total);
    for (idx, scenario) in scenarios.iter().enumerate() {
        log::info!(
            "[{}/{}] {} ({}), {iterations} iterations",
            idx + 1,
            total,
            scenario.name(),
            scenario.class().as_str()
        );
        let timings = run_scenario(conn, scenario.as_ref(), iterations)?;
        log::info!(
            "{} done in {:.3}s",
            timings.scenario,
            timings.total().as_secs_f64()
        );
        write_raw(out, &timings).context("failed to write timings")?;
        results.push(timings);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::OperationClass;
    use anyhow::bail;
    use std::cell::Cell;

    #[derive(Default)]
    struct Probe {
        fail_at: Option<i64>,
        runs: Cell<i64>,
        setups: Cell<u32>,
        teardowns: Cell<u32>,
    }

    impl Scenario for Probe {
        fn name(&self) -> &'static str {
            "probe"
        }

        fn class(&self) -> OperationClass {
            OperationClass::Insert
        }

        fn setup(&self, _conn: &Connection) -> Result<()> {
            self.setups.set(self.setups.get() + 1);
            Ok(())
        }

        fn run(&self, _conn: &Connection, iteration: i64) -> Result<()> {
            assert_eq!(iteration, self.runs.get(), "iterations run in order");
            self.runs.set(iteration + 1);
            if self.fail_at == Some(iteration) {
                bail!("boom");
            }
            Ok(())
        }

        fn teardown(&self, _conn: &Connection) -> Result<()> {
            self.teardowns.set(self.teardowns.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn runs_every_iteration_between_hooks() {
        let conn = Connection::open_in_memory().unwrap();
        let probe = Probe::default();
        let timings = run_scenario(&conn, &probe, 5).unwrap();
        assert_eq!(timings.iterations(), 5);
        assert_eq!(probe.runs.get(), 5);
        assert_eq!(probe.setups.get(), 1);
        assert_eq!(probe.teardowns.get(), 1);
    }

    #[test]
    fn failure_stops_the_run_and_still_tears_down() {
        let conn = Connection::open_in_memory().unwrap();
        let probe = Probe {
            fail_at: Some(2),
            ..Default::default()
        };
        let err = run_scenario(&conn, &probe, 5).unwrap_err();
        assert_eq!(err.to_string(), "probe: iteration 2 failed");
        assert_eq!(probe.runs.get(), 3);
        assert_eq!(probe.teardowns.get(), 1);
    }

    #[test]
    fn suite_writes_raw_lines() {
        let conn = Connection::open_in_memory().unwrap();
        let scenarios: Vec<Box<dyn Scenario>> = vec![Box::new(Probe::default())];
        let mut out = Vec::new();
        let results = run_suite(&conn, &scenarios, 3, &mut out).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 3);
    }
}
