pub mod cache;
pub mod generator;
pub mod pipeline;
pub mod provider;

// Re-export signals for convenience
pub use generator::{
    default_star_impacts, pace_adjustment, team_form, InjurySignal, PaceSignal, StreakSignal,
    LEAGUE_BASELINE_PACE, MAX_TEAM_IMPACT,
};

pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use pipeline::{AdjustmentPipeline, PipelineResult, StageDelta};
pub use provider::{CachedContextProvider, ContextProvider, StaticContextProvider};
