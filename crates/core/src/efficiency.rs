//! Per-team offensive/defensive rate statistics.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::game::TeamId;

/// League-average points per team per game, substituted for missing roles.
pub const LEAGUE_AVERAGE_POINTS: f64 = 110.0;

/// Weighted scoring averages for one team, split by home/away role.
///
/// A role the team has not played in yet is `None`. Callers read through the
/// `*_or_league_average` accessors or [`or_fallback`], which make the default
/// substitution explicit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamEfficiencyRow {
    pub avg_points_scored_at_home: Option<f64>,
    pub avg_points_allowed_at_home: Option<f64>,
    pub avg_points_scored_away: Option<f64>,
    pub avg_points_allowed_away: Option<f64>,
    /// Number of played home games contributing to the home averages.
    pub home_games: u32,
    /// Number of played away games contributing to the away averages.
    pub away_games: u32,
}

impl TeamEfficiencyRow {
    #[must_use]
    pub fn scored_at_home_or_league_average(&self) -> f64 {
        or_league_average(self.avg_points_scored_at_home)
    }

    #[must_use]
    pub fn allowed_at_home_or_league_average(&self) -> f64 {
        or_league_average(self.avg_points_allowed_at_home)
    }

    #[must_use]
    pub fn scored_away_or_league_average(&self) -> f64 {
        or_league_average(self.avg_points_scored_away)
    }

    #[must_use]
    pub fn allowed_away_or_league_average(&self) -> f64 {
        or_league_average(self.avg_points_allowed_away)
    }

    /// Total games observed in either role.
    #[must_use]
    pub fn games_played(&self) -> u32 {
        self.home_games + self.away_games
    }
}

/// Aggregator output: one row per team that appeared in the training window.
pub type TeamStats = HashMap<TeamId, TeamEfficiencyRow>;

/// Substitutes the league average for a missing (or non-finite) statistic.
#[must_use]
pub fn or_league_average(value: Option<f64>) -> f64 {
    or_fallback(value, LEAGUE_AVERAGE_POINTS)
}

/// Like [`or_league_average`] with a caller-chosen substitute.
#[must_use]
pub fn or_fallback(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => fallback,
    }
}

/// Rounds half away from zero to `places` decimal places.
#[must_use]
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
