//! Single-game prediction path.
//!
//! Runs estimator, adjustment pipeline and edge evaluation for one matchup.
//! The pipeline runs exactly once per prediction and the total is rounded
//! once, after it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use totals_core::{round_to, AdjustmentContext, AppConfig, GameRecord, ModelError, TeamStats};
use totals_signals::{AdjustmentPipeline, StageDelta};

use crate::aggregator::aggregate;
use crate::edge::{EdgeDecision, EdgeEvaluator, Lean};
use crate::estimator::{derive_home_court_bonuses, EstimateBreakdown, Estimator, EstimatorParams};

/// Model output for one matchup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub home_team: String,
    pub away_team: String,
    pub estimate: EstimateBreakdown,
    pub adjustments: Vec<StageDelta>,
    /// Final total, rounded to 1dp.
    pub predicted_total: f64,
}

impl Prediction {
    /// Sum of adjustment deltas.
    #[must_use]
    pub fn adjustment_total(&self) -> f64 {
        self.adjustments.iter().map(|s| s.delta).sum()
    }
}

/// Prediction compared with a market total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupCall {
    pub prediction: Prediction,
    pub market_total: f64,
    pub decision: EdgeDecision,
}

impl MatchupCall {
    /// Short label for reports: OVER, UNDER, PASS or FILTERED.
    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.decision.filtered {
            "FILTERED"
        } else if !self.decision.actionable {
            "PASS"
        } else {
            match self.decision.lean {
                Lean::Over => "OVER",
                Lean::Under => "UNDER",
                Lean::None => "PASS",
            }
        }
    }
}

pub struct Predictor {
    estimator: Estimator,
    pipeline: AdjustmentPipeline,
    evaluator: EdgeEvaluator,
    team_home_court: bool,
}

impl Predictor {
    #[must_use]
    pub fn new(
        estimator: Estimator,
        pipeline: AdjustmentPipeline,
        evaluator: EdgeEvaluator,
    ) -> Self {
        Self {
            estimator,
            pipeline,
            evaluator,
            team_home_court: false,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            estimator: Estimator::from_config(&config.model),
            pipeline: AdjustmentPipeline::from_config(&config.pipeline),
            evaluator: EdgeEvaluator::from_config(&config.edge),
            team_home_court: config.model.team_home_court,
        }
    }

    /// Derive home-court bonuses from each training window.
    #[must_use]
    pub fn with_team_home_court(mut self, enabled: bool) -> Self {
        self.team_home_court = enabled;
        self
    }

    #[must_use]
    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    #[must_use]
    pub fn pipeline(&self) -> &AdjustmentPipeline {
        &self.pipeline
    }

    #[must_use]
    pub fn evaluator(&self) -> &EdgeEvaluator {
        &self.evaluator
    }

    /// Predicts the total for `home_team` hosting `away_team`.
    ///
    /// # Errors
    /// [`ModelError::TeamNotFound`] if either team is missing from `stats`.
    pub fn predict(
        &self,
        stats: &TeamStats,
        home_team: &str,
        away_team: &str,
        ctx: &AdjustmentContext,
    ) -> Result<Prediction, ModelError> {
        let estimate = if self.team_home_court {
            // Configured overrides win over derived ones.
            let mut overrides = derive_home_court_bonuses(stats);
            overrides.extend(
                self.estimator
                    .params()
                    .home_court_overrides
                    .iter()
                    .map(|(team, bonus)| (team.clone(), *bonus)),
            );
            let params = EstimatorParams {
                home_court_overrides: overrides,
                ..self.estimator.params().clone()
            };
            Estimator::new(params).breakdown(stats, home_team, away_team)?
        } else {
            self.estimator.breakdown(stats, home_team, away_team)?
        };

        let adjusted = self.pipeline.apply(home_team, away_team, estimate.total, ctx);
        let predicted_total = round_to(adjusted.adjusted, 1);

        debug!(
            home_team,
            away_team,
            raw = estimate.total,
            adjusted = adjusted.adjusted,
            predicted_total,
            "prediction"
        );

        Ok(Prediction {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            estimate,
            adjustments: adjusted.stages,
            predicted_total,
        })
    }

    /// Predicts and evaluates against `market_total`.
    ///
    /// # Errors
    /// [`ModelError::TeamNotFound`] if either team is missing from `stats`.
    pub fn call(
        &self,
        stats: &TeamStats,
        home_team: &str,
        away_team: &str,
        market_total: f64,
        ctx: &AdjustmentContext,
    ) -> Result<MatchupCall, ModelError> {
        let prediction = self.predict(stats, home_team, away_team, ctx)?;
        let decision = self.evaluator.evaluate(prediction.predicted_total, market_total);
        Ok(MatchupCall {
            prediction,
            market_total,
            decision,
        })
    }

    /// Aggregates `history` and calls one matchup against it.
    ///
    /// # Errors
    /// [`ModelError::Data`] for an unordered history, or
    /// [`ModelError::TeamNotFound`] for a team absent from it.
    pub fn call_from_history(
        &self,
        history: &[GameRecord],
        recency_weighting: bool,
        home_team: &str,
        away_team: &str,
        market_total: f64,
        ctx: &AdjustmentContext,
    ) -> Result<MatchupCall, ModelError> {
        let stats = aggregate(history, recency_weighting)?;
        self.call(&stats, home_team, away_team, market_total, ctx)
    }
}

impl Default for Predictor {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}
