//! Summary metrics for a backtest run.
//!
//! Win rate statistics, filter rate, edge distribution and unit profit at
//! standard -110 pricing. Money is accounted in `Decimal`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use totals_core::{binomial_test, wilson_ci};
use totals_strategy::Lean;

use crate::outcome::{BacktestOutcome, BetResult};

/// Upper bound (inclusive) of the low-edge bucket.
pub const LOW_EDGE_MAX: f64 = 5.0;
/// Upper bound (inclusive) of the medium-edge bucket.
pub const MEDIUM_EDGE_MAX: f64 = 15.0;

/// Win rate needed to break even at -110.
pub const BREAK_EVEN_WIN_RATE: f64 = 110.0 / 210.0;

/// Net units won by one winning bet at -110.
#[must_use]
pub fn unit_win() -> Decimal {
    dec!(100) / dec!(110)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketStats {
    pub bets: usize,
    pub wins: usize,
    pub win_rate: f64,
}

impl BucketStats {
    fn record(&mut self, won: bool) {
        self.bets += 1;
        if won {
            self.wins += 1;
        }
    }

    fn finish(mut self) -> Self {
        self.win_rate = ratio(self.wins, self.bets);
        self
    }
}

/// Decided bets grouped by absolute edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeBuckets {
    /// |edge| <= 5
    pub low: BucketStats,
    /// 5 < |edge| <= 15
    pub medium: BucketStats,
    /// |edge| > 15
    pub high: BucketStats,
}

impl EdgeBuckets {
    fn bucket_mut(&mut self, abs_edge: f64) -> &mut BucketStats {
        if abs_edge <= LOW_EDGE_MAX {
            &mut self.low
        } else if abs_edge <= MEDIUM_EDGE_MAX {
            &mut self.medium
        } else {
            &mut self.high
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    // Counts
    /// Games evaluated (any result).
    pub total_evaluated: usize,
    /// Decided bets (wins + losses).
    pub bets: usize,
    pub wins: usize,
    pub losses: usize,
    pub pushes: usize,
    pub filtered: usize,
    /// Unfiltered calls below the minimum edge.
    pub passes: usize,

    // Rates
    /// wins / bets.
    pub win_rate: f64,
    /// filtered / evaluated.
    pub filter_rate: f64,
    /// Mean |edge| over non-filtered outcomes.
    pub mean_abs_edge: f64,
    /// Sum of signed edges over non-filtered outcomes.
    pub total_edge: f64,

    // Split
    pub over_bets: usize,
    pub over_wins: usize,
    pub under_bets: usize,
    pub under_wins: usize,
    pub edge_buckets: EdgeBuckets,

    // Significance
    pub wilson_ci_lower: f64,
    pub wilson_ci_upper: f64,
    /// Two-tailed binomial p-value against 50%.
    pub p_value: f64,
    pub is_significant: bool,

    // Money
    /// Net units at -110 (win +100/110, loss -1).
    pub units: Decimal,
    /// units / bets.
    pub roi: Decimal,
    /// `win_rate * 5 - (1 - win_rate) * 5`, percent per bet at a flat 5% margin.
    pub flat_margin_roi_pct: f64,
}

impl BacktestSummary {
    /// Summarizes a list of outcomes.
    #[must_use]
    pub fn from_outcomes(outcomes: &[BacktestOutcome]) -> Self {
        let mut wins = 0;
        let mut losses = 0;
        let mut pushes = 0;
        let mut filtered = 0;
        let mut passes = 0;
        let mut over = BucketStats::default();
        let mut under = BucketStats::default();
        let mut buckets = EdgeBuckets::default();
        let mut abs_edge_sum = 0.0;
        let mut total_edge = 0.0;
        let mut units = Decimal::ZERO;

        for outcome in outcomes {
            if outcome.result != BetResult::Filtered {
                abs_edge_sum += outcome.abs_edge();
                total_edge += outcome.edge;
            }

            match outcome.result {
                BetResult::Filtered => filtered += 1,
                BetResult::Push => pushes += 1,
                BetResult::Pass => passes += 1,
                BetResult::Win | BetResult::Loss => {
                    let won = outcome.result == BetResult::Win;
                    if won {
                        wins += 1;
                        units += unit_win();
                    } else {
                        losses += 1;
                        units -= Decimal::ONE;
                    }
                    buckets.bucket_mut(outcome.abs_edge()).record(won);
                    match outcome.lean {
                        Lean::Over => over.record(won),
                        Lean::Under => under.record(won),
                        Lean::None => {}
                    }
                }
            }
        }

        let total_evaluated = outcomes.len();
        let bets = wins + losses;
        let unfiltered = total_evaluated - filtered;
        let win_rate = ratio(wins, bets);
        let (wilson_ci_lower, wilson_ci_upper) = wilson_ci(wins, bets, 1.96);
        let p_value = binomial_test(wins, bets, 0.5);

        let roi = if bets > 0 {
            (units / Decimal::from(bets)).round_dp(6)
        } else {
            Decimal::ZERO
        };

        Self {
            total_evaluated,
            bets,
            wins,
            losses,
            pushes,
            filtered,
            passes,
            win_rate,
            filter_rate: ratio(filtered, total_evaluated),
            mean_abs_edge: if unfiltered > 0 {
                abs_edge_sum / unfiltered as f64
            } else {
                0.0
            },
            total_edge,
            over_bets: over.bets,
            over_wins: over.wins,
            under_bets: under.bets,
            under_wins: under.wins,
            edge_buckets: EdgeBuckets {
                low: buckets.low.finish(),
                medium: buckets.medium.finish(),
                high: buckets.high.finish(),
            },
            wilson_ci_lower,
            wilson_ci_upper,
            p_value,
            is_significant: bets > 0 && p_value < 0.05,
            units: units.round_dp(6),
            roi,
            flat_margin_roi_pct: if bets > 0 {
                win_rate * 5.0 - (1.0 - win_rate) * 5.0
            } else {
                0.0
            },
        }
    }

    /// True if the win rate beats the -110 break-even point.
    #[must_use]
    pub fn is_profitable(&self) -> bool {
        self.bets > 0 && self.win_rate > BREAK_EVEN_WIN_RATE
    }

    /// Units as a float, for display.
    #[must_use]
    pub fn units_f64(&self) -> f64 {
        self.units.to_f64().unwrap_or(0.0)
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
