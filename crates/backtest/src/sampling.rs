//! Repeated sampled walk-forward runs.
//!
//! Each run evaluates a random subset of indices, always training on the full
//! prefix before each one. Runs are seeded `seed + run` with `ChaCha8Rng` so
//! a report is reproducible.

use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use totals_core::{mean_ci95, mean_std, AdjustmentContext, GameRecord, ModelError};

use crate::harness::{BacktestConfig, BacktestHarness};
use crate::metrics::BacktestSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleConfig {
    pub runs: usize,
    /// Indices evaluated per run.
    pub sample_size: usize,
    pub seed: u64,
    /// Lowest index eligible for sampling.
    pub min_index: usize,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            runs: 40,
            sample_size: 30,
            seed: 42,
            min_index: 100,
        }
    }
}

impl SampleConfig {
    #[must_use]
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_min_index(mut self, min_index: usize) -> Self {
        self.min_index = min_index;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampledRun {
    pub run: usize,
    pub seed: u64,
    pub indices: Vec<usize>,
    pub summary: BacktestSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampledReport {
    pub runs: Vec<SampledRun>,
    /// Runs with at least one decided bet; the win-rate statistics use only these.
    pub runs_with_bets: usize,
    pub mean_win_rate: f64,
    pub std_win_rate: f64,
    pub win_rate_ci: (f64, f64),
    pub mean_edge: f64,
    pub std_edge: f64,
    pub edge_ci: (f64, f64),
    /// Totals across all runs.
    pub total_bets: usize,
    pub total_wins: usize,
}

impl SampledReport {
    #[must_use]
    pub fn from_runs(runs: Vec<SampledRun>) -> Self {
        let win_rates: Vec<f64> = runs
            .iter()
            .filter(|r| r.summary.bets > 0)
            .map(|r| r.summary.win_rate)
            .collect();
        let edges: Vec<f64> = runs
            .iter()
            .filter(|r| r.summary.total_evaluated > r.summary.filtered)
            .map(|r| r.summary.mean_abs_edge)
            .collect();

        let (mean_win_rate, std_win_rate) = mean_std(&win_rates);
        let (mean_edge, std_edge) = mean_std(&edges);

        Self {
            runs_with_bets: win_rates.len(),
            mean_win_rate,
            std_win_rate,
            win_rate_ci: mean_ci95(&win_rates),
            mean_edge,
            std_edge,
            edge_ci: mean_ci95(&edges),
            total_bets: runs.iter().map(|r| r.summary.bets).sum(),
            total_wins: runs.iter().map(|r| r.summary.wins).sum(),
            runs,
        }
    }

    /// Pooled win rate over every bet in every run.
    #[must_use]
    pub fn pooled_win_rate(&self) -> f64 {
        if self.total_bets == 0 {
            0.0
        } else {
            self.total_wins as f64 / self.total_bets as f64
        }
    }
}

/// Distinct indices in `min_index..n` chosen for `run`, ascending.
///
/// Returns every eligible index when fewer than `sample_size` exist.
#[must_use]
pub fn sample_indices(n: usize, config: &SampleConfig, run: usize) -> Vec<usize> {
    if config.min_index >= n {
        return Vec::new();
    }
    let eligible = n - config.min_index;
    let amount = config.sample_size.min(eligible);
    let mut rng = ChaCha8Rng::seed_from_u64(run_seed(config.seed, run));

    let mut indices: Vec<usize> = index::sample(&mut rng, eligible, amount)
        .into_iter()
        .map(|i| i + config.min_index)
        .collect();
    indices.sort_unstable();
    indices
}

fn run_seed(seed: u64, run: usize) -> u64 {
    seed.wrapping_add(run as u64)
}

/// Runs `sample.runs` sampled walk-forward backtests.
///
/// # Errors
/// [`ModelError::Data`] if the log is unordered or malformed.
pub fn run_sampled(
    games: &[GameRecord],
    config: &BacktestConfig,
    sample: &SampleConfig,
    context: &AdjustmentContext,
) -> Result<SampledReport, ModelError> {
    let mut runs = Vec::with_capacity(sample.runs);

    for run in 0..sample.runs {
        let indices = sample_indices(games.len(), sample, run);
        let harness = BacktestHarness::new(config.clone().with_evaluation_indices(indices.clone()))
            .with_context(context.clone());
        let result = harness.run(games)?;
        runs.push(SampledRun {
            run,
            seed: run_seed(sample.seed, run),
            indices,
            summary: result.summary,
        });
    }

    let report = SampledReport::from_runs(runs);
    info!(
        runs = report.runs.len(),
        mean_win_rate = report.mean_win_rate,
        ci_low = report.win_rate_ci.0,
        ci_high = report.win_rate_ci.1,
        "sampled backtest complete"
    );
    Ok(report)
}
