//! Harness constants shared by the seeder, the benchmark suite and the CLI.

/// Rows written to the seeded table by a default seeding run.
pub const SEED_ROW_COUNT: u64 = 2_000_000;

/// The seeder reports progress every this many rows.
pub const SEED_PROGRESS_INTERVAL: u64 = 100_000;

/// Read scenarios print one progress marker per decoded id divisible by this.
pub const DECODE_PROGRESS_INTERVAL: i64 = 100_000;

/// Default timed iterations per scenario for the standalone runner.
pub const DEFAULT_ITERATIONS: u32 = 10;

/// Long-lived table holding the document column and its mirrored typed columns.
pub const SEED_TABLE: &str = "perf";

/// Throwaway table recreated before every write benchmark run.
pub const INSERT_TABLE: &str = "perf2";

/// Labels interpolated with the record id by the generator.
pub const NAME_LABEL: &str = "MyName";
pub const STATUS_LABEL: &str = "MyStatus";
pub const CODE_LABEL: &str = "MyCode";

/// Label written by the update scenarios.
pub const UPDATE_NAME_LABEL: &str = "UpdateName";

/// `num`/`num2` are derived as `id + NUM_OFFSET`.
pub const NUM_OFFSET: i64 = 7;

/// `entries` is derived as `id + ENTRIES_OFFSET`.
pub const ENTRIES_OFFSET: i64 = 10;
