//! Per-game backtest outcomes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use totals_strategy::{EdgeDecision, Lean};

/// Settlement of one evaluated game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BetResult {
    /// The lean matched the side the game finished on.
    Win,
    Loss,
    /// Prediction equalled the market; no side taken.
    Push,
    /// The outlier filter suppressed the bet.
    Filtered,
    /// Edge below the minimum; no bet taken.
    Pass,
}

impl BetResult {
    /// Classifies a decision against the realized total.
    ///
    /// Filtered wins over everything, then a zero edge is a push, then a
    /// non-actionable call passes. Otherwise the bet wins when prediction and
    /// result fall on the same side of the market.
    #[must_use]
    pub fn classify(decision: &EdgeDecision, predicted: f64, market: f64, actual: f64) -> Self {
        if decision.filtered {
            Self::Filtered
        } else if decision.edge == 0.0 {
            Self::Push
        } else if !decision.actionable {
            Self::Pass
        } else if (predicted > market) == (actual > market) {
            Self::Win
        } else {
            Self::Loss
        }
    }

    /// True for a decided (win or loss) bet.
    #[must_use]
    pub fn is_bet(self) -> bool {
        matches!(self, Self::Win | Self::Loss)
    }
}

impl fmt::Display for BetResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Win => write!(f, "WIN"),
            Self::Loss => write!(f, "LOSS"),
            Self::Push => write!(f, "PUSH"),
            Self::Filtered => write!(f, "FILTERED"),
            Self::Pass => write!(f, "PASS"),
        }
    }
}

/// One row per evaluated game. Flat so it writes directly as CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestOutcome {
    /// Position of the game in the log.
    pub index: usize,
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub predicted_total: f64,
    pub market_total: f64,
    /// `predicted - market`, 2dp.
    pub edge: f64,
    pub actual_total: u32,
    pub lean: Lean,
    pub result: BetResult,
    /// Cleared the outlier filter and the minimum edge.
    pub actionable: bool,
    /// Sum of pipeline adjustments included in the prediction.
    pub adjustment: f64,
    /// Played games in the training prefix.
    pub training_games: usize,
}

impl BacktestOutcome {
    #[must_use]
    pub fn is_bet(&self) -> bool {
        self.result.is_bet()
    }

    #[must_use]
    pub fn abs_edge(&self) -> f64 {
        self.edge.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use totals_strategy::EdgeEvaluator;

    fn classify(predicted: f64, market: f64, actual: f64) -> BetResult {
        let decision = EdgeEvaluator::default().evaluate(predicted, market);
        BetResult::classify(&decision, predicted, market, actual)
    }

    #[test]
    fn over_call_wins_when_game_goes_over() {
        assert_eq!(classify(224.0, 220.5, 226.0), BetResult::Win);
        assert_eq!(classify(224.0, 220.5, 215.0), BetResult::Loss);
    }

    #[test]
    fn under_call_wins_when_game_stays_under() {
        assert_eq!(classify(216.0, 220.5, 210.0), BetResult::Win);
        assert_eq!(classify(216.0, 220.5, 230.0), BetResult::Loss);
    }

    #[test]
    fn zero_edge_is_push() {
        assert_eq!(classify(220.5, 220.5, 230.0), BetResult::Push);
    }

    #[test]
    fn filter_takes_precedence() {
        assert_eq!(classify(216.5, 229.0, 200.0), BetResult::Filtered);
    }

    #[test]
    fn small_edge_passes_under_min_edge() {
        let evaluator = EdgeEvaluator::default().with_min_edge(3.0);
        let small = evaluator.evaluate(222.0, 220.5);
        assert!(!small.actionable);
        assert_eq!(BetResult::classify(&small, 222.0, 220.5, 230.0), BetResult::Pass);

        let large = evaluator.evaluate(224.0, 220.5);
        assert_eq!(BetResult::classify(&large, 224.0, 220.5, 230.0), BetResult::Win);

        let zero = evaluator.evaluate(220.5, 220.5);
        assert_eq!(BetResult::classify(&zero, 220.5, 220.5, 230.0), BetResult::Push);
    }

    #[test]
    fn results_serialize_uppercase() {
        assert_eq!(serde_json::to_string(&BetResult::Filtered).unwrap(), "\"FILTERED\"");
        assert_eq!(BetResult::Loss.to_string(), "LOSS");
        assert!(BetResult::Win.is_bet());
        assert!(!BetResult::Push.is_bet());
        assert!(!BetResult::Pass.is_bet());
        assert_eq!(serde_json::to_string(&BetResult::Pass).unwrap(), "\"PASS\"");
    }
}
