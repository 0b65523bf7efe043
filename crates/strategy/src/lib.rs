//! Team aggregation, total estimation and edge evaluation.

pub mod aggregator;
pub mod edge;
pub mod estimator;
pub mod predictor;

pub use aggregator::{aggregate, recency_split, EfficiencyAggregator, RECENT_GAME_WEIGHT};
pub use edge::{line_movement, EdgeDecision, EdgeEvaluator, Lean, LineMovement};
pub use estimator::{derive_home_court_bonuses, EstimateBreakdown, Estimator, EstimatorParams};
pub use predictor::{MatchupCall, Prediction, Predictor};
