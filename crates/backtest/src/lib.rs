//! Walk-forward backtesting for game total predictions.
//!
//! The harness replays a chronological game log, training on every game
//! before each index and scoring the prediction against the market total and
//! the realized result.

pub mod harness;
pub mod metrics;
pub mod outcome;
pub mod sampling;
pub mod sweep;

pub use harness::{BacktestConfig, BacktestHarness, BacktestRun, StepState};
pub use metrics::{BacktestSummary, BucketStats, EdgeBuckets, BREAK_EVEN_WIN_RATE};
pub use outcome::{BacktestOutcome, BetResult};
pub use sampling::{run_sampled, sample_indices, SampleConfig, SampledReport, SampledRun};
pub use sweep::{
    best_row, run_for_multiplier, sweep_multipliers, SweepReport, SweepRow, DEFAULT_MULTIPLIERS,
};
