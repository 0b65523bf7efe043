//! Adjustment signal implementations.
//!
//! Each signal turns one kind of external context into an additive point
//! delta on a total estimate.

mod injury;
mod pace;
mod streak;

pub use injury::{
    default_star_impacts, InjurySignal, MAX_TEAM_IMPACT, MULTI_STAR_DAMPING, ROLE_PLAYER_IMPACT,
};
pub use pace::{pace_adjustment, PaceSignal, DEFAULT_POINTS_PER_PACE_UNIT, LEAGUE_BASELINE_PACE};
pub use streak::{team_form, StreakSignal, COLD_WIN_PCT, HOT_WIN_PCT, STREAK_POINTS};
