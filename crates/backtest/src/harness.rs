//! Walk-forward backtest harness.
//!
//! For each index `i` the model trains on exactly `games[0..i]` and predicts
//! game `i`, in one forward pass. Each step moves through
//! [`StepState`]: it either waits for more history, is unusable, errors, or
//! records an outcome. Errors on one step never abort the run; only a
//! malformed or unordered log does.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use totals_core::{
    validate_log, AdjustmentContext, AppConfig, EdgeConfig, GameRecord, ModelConfig, ModelError,
    PipelineConfig,
};
use totals_strategy::{aggregate, MatchupCall, Predictor};

use crate::metrics::BacktestSummary;
use crate::outcome::{BacktestOutcome, BetResult};

/// Configuration for a walk-forward run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub model: ModelConfig,
    pub pipeline: PipelineConfig,
    pub edge: EdgeConfig,
    /// Played games required in the prefix before a step is evaluated.
    pub min_training_games: usize,
    /// Restrict evaluation to these indices (ascending). `None` = every index.
    pub evaluation_indices: Option<Vec<usize>>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for BacktestConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            pipeline: config.pipeline.clone(),
            edge: config.edge.clone(),
            min_training_games: config.backtest.min_training_games,
            evaluation_indices: None,
        }
    }
}

impl BacktestConfig {
    /// Sets the estimator's total multiplier.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.model.total_multiplier = multiplier;
        self
    }

    /// Sets the minimum played games in the training prefix.
    #[must_use]
    pub fn with_min_training_games(mut self, min: usize) -> Self {
        self.min_training_games = min;
        self
    }

    /// Enables or disables recency weighting in aggregation.
    #[must_use]
    pub fn with_recency_weighting(mut self, enabled: bool) -> Self {
        self.model.recency_weighting = enabled;
        self
    }

    /// Restricts evaluation to the given indices.
    #[must_use]
    pub fn with_evaluation_indices(mut self, mut indices: Vec<usize>) -> Self {
        indices.sort_unstable();
        indices.dedup();
        self.evaluation_indices = Some(indices);
        self
    }

    /// Sets the minimum absolute edge for a bet.
    #[must_use]
    pub fn with_min_edge(mut self, min_edge: f64) -> Self {
        self.edge.min_edge = min_edge;
        self
    }

    /// Sets the outlier filter threshold.
    #[must_use]
    pub fn with_outlier_threshold(mut self, threshold: f64) -> Self {
        self.edge.outlier_threshold = threshold;
        self
    }

    fn app_config(&self) -> AppConfig {
        AppConfig {
            model: self.model.clone(),
            pipeline: self.pipeline.clone(),
            edge: self.edge.clone(),
            ..AppConfig::default()
        }
    }
}

/// Where a single walk-forward step ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum StepState {
    /// Too few played games before this index.
    AwaitingMinimumHistory,
    /// No market total, or the game itself has not been played.
    Unusable,
    /// The model could not score this game (e.g. a team with no history).
    Errored(ModelError),
    Recorded(BacktestOutcome),
}

/// Result of one walk-forward run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRun {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub outcomes: Vec<BacktestOutcome>,
    pub summary: BacktestSummary,
    /// Indices considered (all, or the requested subset).
    pub steps: usize,
    pub skipped_insufficient_history: usize,
    pub skipped_unusable: usize,
    pub skipped_errors: usize,
}

pub struct BacktestHarness {
    config: BacktestConfig,
    predictor: Predictor,
    context: AdjustmentContext,
}

impl BacktestHarness {
    #[must_use]
    pub fn new(config: BacktestConfig) -> Self {
        let predictor = Predictor::from_config(&config.app_config());
        Self {
            config,
            predictor,
            context: AdjustmentContext::empty(),
        }
    }

    /// Uses `context` for every step of the run.
    #[must_use]
    pub fn with_context(mut self, context: AdjustmentContext) -> Self {
        self.context = context;
        self
    }

    /// Replaces the predictor built from the config.
    #[must_use]
    pub fn with_predictor(mut self, predictor: Predictor) -> Self {
        self.predictor = predictor;
        self
    }

    #[must_use]
    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Runs the walk-forward backtest over `games`.
    ///
    /// # Errors
    /// [`ModelError::Data`] if `games` is unordered or contains a malformed
    /// record. Per-step failures are counted, not returned.
    pub fn run(&self, games: &[GameRecord]) -> Result<BacktestRun, ModelError> {
        validate_log(games)?;

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            %run_id,
            games = games.len(),
            multiplier = self.config.model.total_multiplier,
            min_training_games = self.config.min_training_games,
            "starting walk-forward backtest"
        );

        // played_before[i] = played games in games[0..i]
        let mut played_before = Vec::with_capacity(games.len() + 1);
        played_before.push(0usize);
        for game in games {
            let last = played_before.last().copied().unwrap_or(0);
            played_before.push(last + usize::from(game.is_played()));
        }

        let indices: Vec<usize> = match &self.config.evaluation_indices {
            Some(indices) => indices.iter().copied().filter(|&i| i < games.len()).collect(),
            None => (0..games.len()).collect(),
        };

        let mut outcomes = Vec::new();
        let mut skipped_insufficient_history = 0;
        let mut skipped_unusable = 0;
        let mut skipped_errors = 0;

        for &i in &indices {
            match self.step_with_history(games, i, played_before[i]) {
                StepState::AwaitingMinimumHistory => skipped_insufficient_history += 1,
                StepState::Unusable => skipped_unusable += 1,
                StepState::Errored(e) => {
                    debug!(index = i, game = %games[i].matchup(), error = %e, "step skipped");
                    skipped_errors += 1;
                }
                StepState::Recorded(outcome) => outcomes.push(outcome),
            }
        }

        let summary = BacktestSummary::from_outcomes(&outcomes);
        info!(
            %run_id,
            evaluated = summary.total_evaluated,
            bets = summary.bets,
            win_rate = summary.win_rate,
            skipped_insufficient_history,
            skipped_unusable,
            skipped_errors,
            "walk-forward backtest complete"
        );

        Ok(BacktestRun {
            run_id,
            started_at,
            outcomes,
            summary,
            steps: indices.len(),
            skipped_insufficient_history,
            skipped_unusable,
            skipped_errors,
        })
    }

    /// Evaluates index `i` using only `games[0..i]` for training.
    ///
    /// An index past the end of the log is [`StepState::Errored`] with
    /// [`ModelError::Data`].
    #[must_use]
    pub fn step(&self, games: &[GameRecord], i: usize) -> StepState {
        if i >= games.len() {
            return StepState::Errored(ModelError::Data(format!(
                "index {i} out of range for a log of {} games",
                games.len()
            )));
        }
        let played_before = games[..i].iter().filter(|g| g.is_played()).count();
        self.step_with_history(games, i, played_before)
    }

    /// `played_before` must equal the played games in `games[0..i]`.
    fn step_with_history(&self, games: &[GameRecord], i: usize, played_before: usize) -> StepState {
        if played_before < self.config.min_training_games {
            return StepState::AwaitingMinimumHistory;
        }

        let current = &games[i];
        let Some(market) = current.market_total else {
            return StepState::Unusable;
        };
        if !current.is_played() {
            return StepState::Unusable;
        }

        match self.evaluate(&games[..i], current, market) {
            Ok(call) => StepState::Recorded(self.record(i, current, market, &call, played_before)),
            Err(e) => StepState::Errored(e),
        }
    }

    fn evaluate(
        &self,
        training: &[GameRecord],
        current: &GameRecord,
        market: f64,
    ) -> Result<MatchupCall, ModelError> {
        let stats = aggregate(training, self.config.model.recency_weighting)?;
        self.predictor
            .call(&stats, &current.home_team, &current.away_team, market, &self.context)
    }

    fn record(
        &self,
        index: usize,
        current: &GameRecord,
        market: f64,
        call: &MatchupCall,
        training_games: usize,
    ) -> BacktestOutcome {
        let predicted = call.prediction.predicted_total;
        let actual = current.total_points();
        let result = BetResult::classify(&call.decision, predicted, market, f64::from(actual));

        debug!(
            index,
            game = %current.matchup(),
            predicted,
            market,
            edge = call.decision.edge,
            actual,
            %result,
            "step recorded"
        );

        BacktestOutcome {
            index,
            date: current.date,
            home_team: current.home_team.clone(),
            away_team: current.away_team.clone(),
            predicted_total: predicted,
            market_total: market,
            edge: call.decision.edge,
            actual_total: actual,
            lean: call.decision.lean,
            result,
            actionable: call.decision.actionable,
            adjustment: call.prediction.adjustment_total(),
            training_games,
        }
    }
}
