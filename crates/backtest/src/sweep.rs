//! Total-multiplier sweep.
//!
//! Runs one independent walk-forward backtest per multiplier. Runs share
//! nothing, so callers may fan them out across threads with
//! [`run_for_multiplier`] and collect the rows with [`SweepReport::from_rows`].

use serde::{Deserialize, Serialize};
use tracing::info;

use totals_core::{AdjustmentContext, GameRecord, ModelError};

use crate::harness::{BacktestConfig, BacktestHarness};
use crate::metrics::BacktestSummary;

/// Multipliers tried when none are given.
pub const DEFAULT_MULTIPLIERS: [f64; 7] = [0.95, 0.98, 1.0, 1.02, 1.05, 1.08, 1.1];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub multiplier: f64,
    pub summary: BacktestSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    /// One row per multiplier, in the order requested.
    pub rows: Vec<SweepRow>,
    /// Highest win rate; ties go to the row with more bets.
    pub best: Option<SweepRow>,
}

impl SweepReport {
    #[must_use]
    pub fn from_rows(rows: Vec<SweepRow>) -> Self {
        let best = best_row(&rows).cloned();
        Self { rows, best }
    }
}

/// Row with the highest win rate among rows with at least one bet.
#[must_use]
pub fn best_row(rows: &[SweepRow]) -> Option<&SweepRow> {
    rows.iter()
        .filter(|row| row.summary.bets > 0)
        .max_by(|a, b| {
            a.summary
                .win_rate
                .total_cmp(&b.summary.win_rate)
                .then(a.summary.bets.cmp(&b.summary.bets))
        })
}

/// Backtests `games` with `base` and the given multiplier.
///
/// # Errors
/// [`ModelError::Data`] if the log is unordered or malformed.
pub fn run_for_multiplier(
    games: &[GameRecord],
    base: &BacktestConfig,
    multiplier: f64,
    context: &AdjustmentContext,
) -> Result<SweepRow, ModelError> {
    let config = base.clone().with_multiplier(multiplier);
    let run = BacktestHarness::new(config)
        .with_context(context.clone())
        .run(games)?;
    info!(
        multiplier,
        bets = run.summary.bets,
        win_rate = run.summary.win_rate,
        "sweep row"
    );
    Ok(SweepRow {
        multiplier,
        summary: run.summary,
    })
}

/// Sequential sweep over `multipliers`.
///
/// # Errors
/// [`ModelError::Data`] if the log is unordered or malformed.
pub fn sweep_multipliers(
    games: &[GameRecord],
    base: &BacktestConfig,
    multipliers: &[f64],
    context: &AdjustmentContext,
) -> Result<SweepReport, ModelError> {
    let rows = multipliers
        .iter()
        .map(|&m| run_for_multiplier(games, base, m, context))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SweepReport::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(multiplier: f64, wins: usize, losses: usize) -> SweepRow {
        let mut summary = BacktestSummary::from_outcomes(&[]);
        summary.wins = wins;
        summary.losses = losses;
        summary.bets = wins + losses;
        summary.win_rate = if summary.bets > 0 {
            wins as f64 / summary.bets as f64
        } else {
            0.0
        };
        SweepRow { multiplier, summary }
    }

    #[test]
    fn best_is_highest_win_rate() {
        let rows = vec![row(0.95, 5, 5), row(1.0, 7, 3), row(1.05, 6, 4)];
        assert_eq!(best_row(&rows).map(|r| r.multiplier), Some(1.0));
    }

    #[test]
    fn ties_go_to_more_bets() {
        let rows = vec![row(0.98, 6, 4), row(1.02, 12, 8), row(1.1, 3, 2)];
        assert_eq!(best_row(&rows).map(|r| r.multiplier), Some(1.02));
    }

    #[test]
    fn rows_without_bets_are_never_best() {
        let rows = vec![row(0.95, 0, 0)];
        assert!(best_row(&rows).is_none());
        assert!(SweepReport::from_rows(rows).best.is_none());
    }

    #[test]
    fn sweep_keeps_requested_order() {
        let games = totals_data::generate_games(
            &totals_data::SyntheticConfig::default().with_games(60),
        )
        .unwrap();
        let report = sweep_multipliers(
            &games,
            &BacktestConfig::default(),
            &[1.05, 0.95],
            &AdjustmentContext::empty(),
        )
        .unwrap();
        let order: Vec<f64> = report.rows.iter().map(|r| r.multiplier).collect();
        assert_eq!(order, vec![1.05, 0.95]);
    }

    #[test]
    fn default_grid() {
        assert_eq!(DEFAULT_MULTIPLIERS.len(), 7);
        assert!(DEFAULT_MULTIPLIERS.windows(2).all(|w| w[0] < w[1]));
    }
}
