//! Raw timing output. One line per timed iteration:
//! `<scenario>\t<iteration>\t<nanoseconds>`.
//!
//! Aggregation (means, percentiles) is left to whatever consumes the lines.

use std::io::{self, Write};
use std::time::Duration;

/// Per-iteration timings from one scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioTimings {
    pub scenario: String,
    pub durations: Vec<Duration>,
}

impl ScenarioTimings {
    pub fn new(scenario: &str, capacity: usize) -> Self {
        Self {
            scenario: scenario.to_string(),
            durations: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, elapsed: Duration) {
        self.durations.push(elapsed);
    }

    pub fn iterations(&self) -> usize {
        self.durations.len()
    }

    /// Wall time spent inside timed iterations.
    pub fn total(&self) -> Duration {
        self.durations.iter().sum()
    }
}

/// Write one line per iteration of `timings`.
pub fn write_raw(out: &mut impl Write, timings: &ScenarioTimings) -> io::Result<()> {
    for (i, d) in timings.durations.iter().enumerate() {
        writeln!(out, "{}\t{}\t{}", timings.scenario, i, d.as_nanos())?;
    }
    Ok(())
}
