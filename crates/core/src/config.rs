use serde::{Deserialize, Serialize};

use crate::efficiency::LEAGUE_AVERAGE_POINTS;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub pipeline: PipelineConfig,
    pub edge: EdgeConfig,
    pub backtest: BacktestSettings,
    pub context: ContextConfig,
}

/// Estimator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Points added for home court before scaling.
    pub home_court_bonus: f64,
    /// Multiplier applied to base + bonus.
    pub total_multiplier: f64,
    /// Final additive nudge after scaling.
    pub market_calibration: f64,
    /// Weight the most recent third of the training window 3x.
    pub recency_weighting: bool,
    /// Derive a per-team home-court bonus from the training window.
    pub team_home_court: bool,
    /// Substitute for a team role with no games.
    pub league_average: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            home_court_bonus: 3.5,
            total_multiplier: 1.0,
            market_calibration: 0.0,
            recency_weighting: false,
            team_home_court: false,
            league_average: LEAGUE_AVERAGE_POINTS,
        }
    }
}

/// Which adjustment signals run, and their scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub pace: bool,
    pub injury: bool,
    pub streak: bool,
    /// Points per pace unit above or below the league baseline.
    pub pace_points_per_unit: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pace: true,
            injury: true,
            streak: true,
            pace_points_per_unit: 0.4,
        }
    }
}

/// Edge evaluation thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// Divergence above which the model is distrusted.
    pub outlier_threshold: f64,
    /// Minimum absolute edge for a decision to count as actionable.
    pub min_edge: f64,
    /// Reference line for movement classification.
    pub default_line: f64,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            outlier_threshold: 12.0,
            min_edge: 0.0,
            default_line: 220.5,
        }
    }
}

/// Walk-forward harness settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSettings {
    /// Played games required in the training prefix before evaluating.
    pub min_training_games: usize,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            min_training_games: 4,
        }
    }
}

/// External adjustment context source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// JSON file with pace, injuries and records sections.
    pub path: Option<String>,
    /// Freshness window for cached context.
    pub ttl_secs: u64,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            path: None,
            ttl_secs: 3600,
        }
    }
}
