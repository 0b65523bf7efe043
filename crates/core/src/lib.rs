pub mod config;
pub mod config_loader;
pub mod efficiency;
pub mod error;
pub mod game;
pub mod signal;
pub mod stats;

pub use config::{
    AppConfig, BacktestSettings, ContextConfig, EdgeConfig, ModelConfig, PipelineConfig,
};
pub use config_loader::ConfigLoader;
pub use efficiency::{
    or_fallback, or_league_average, round_to, TeamEfficiencyRow, TeamStats, LEAGUE_AVERAGE_POINTS,
};
pub use error::ModelError;
pub use game::{ensure_chronological, validate_log, GameRecord, TeamId};
pub use signal::{AdjustmentContext, AdjustmentSignal, TeamRecord};
pub use stats::{binomial_test, mean_ci95, mean_std, wilson_ci, WinRateStats};
