//! Matchup total estimator.
//!
//! `base = (home scored at home + away scored away + home allowed at home +
//! away allowed away) / 2`, then home-court bonus, multiplier and market
//! calibration in that order. Pace, injury and form adjustments are not
//! applied here; they belong to the adjustment pipeline.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use totals_core::{
    or_fallback, round_to, ModelConfig, ModelError, TeamEfficiencyRow, TeamId, TeamStats,
    LEAGUE_AVERAGE_POINTS,
};

/// Upper bound for a derived per-team home-court bonus.
pub const MAX_DERIVED_HOME_COURT: f64 = 7.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorParams {
    pub home_court_bonus: f64,
    pub total_multiplier: f64,
    pub market_calibration: f64,
    /// Per-team bonus replacing `home_court_bonus` when the team is at home.
    pub home_court_overrides: HashMap<TeamId, f64>,
    /// Substitute for a statistic the team has no games for.
    pub league_average: f64,
}

impl Default for EstimatorParams {
    fn default() -> Self {
        Self {
            home_court_bonus: 3.5,
            total_multiplier: 1.0,
            market_calibration: 0.0,
            home_court_overrides: HashMap::new(),
            league_average: LEAGUE_AVERAGE_POINTS,
        }
    }
}

impl From<&ModelConfig> for EstimatorParams {
    fn from(config: &ModelConfig) -> Self {
        Self {
            home_court_bonus: config.home_court_bonus,
            total_multiplier: config.total_multiplier,
            market_calibration: config.market_calibration,
            home_court_overrides: HashMap::new(),
            league_average: config.league_average,
        }
    }
}

impl EstimatorParams {
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.total_multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn with_home_court_bonus(mut self, bonus: f64) -> Self {
        self.home_court_bonus = bonus;
        self
    }

    #[must_use]
    pub fn with_calibration(mut self, calibration: f64) -> Self {
        self.market_calibration = calibration;
        self
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: HashMap<TeamId, f64>) -> Self {
        self.home_court_overrides = overrides;
        self
    }

    /// Bonus applied when `home_team` hosts.
    #[must_use]
    pub fn bonus_for(&self, home_team: &str) -> f64 {
        self.home_court_overrides
            .get(home_team)
            .copied()
            .unwrap_or(self.home_court_bonus)
    }
}

/// Intermediate values of one estimate, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimateBreakdown {
    pub base: f64,
    pub home_court: f64,
    pub multiplier: f64,
    pub calibration: f64,
    /// `(base + home_court) * multiplier + calibration`.
    pub total: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Estimator {
    params: EstimatorParams,
}

impl Estimator {
    #[must_use]
    pub fn new(params: EstimatorParams) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(EstimatorParams::from(config))
    }

    #[must_use]
    pub fn params(&self) -> &EstimatorParams {
        &self.params
    }

    /// Estimated total rounded to one decimal place.
    ///
    /// # Errors
    /// [`ModelError::TeamNotFound`] if either team has no row in `stats`.
    pub fn estimate(
        &self,
        stats: &TeamStats,
        home_team: &str,
        away_team: &str,
    ) -> Result<f64, ModelError> {
        Ok(round_to(self.estimate_raw(stats, home_team, away_team)?, 1))
    }

    /// Unrounded estimate, for composition with the adjustment pipeline.
    ///
    /// # Errors
    /// [`ModelError::TeamNotFound`] if either team has no row in `stats`.
    pub fn estimate_raw(
        &self,
        stats: &TeamStats,
        home_team: &str,
        away_team: &str,
    ) -> Result<f64, ModelError> {
        Ok(self.breakdown(stats, home_team, away_team)?.total)
    }

    /// Full breakdown of the estimate.
    ///
    /// # Errors
    /// [`ModelError::TeamNotFound`] if either team has no row in `stats`.
    pub fn breakdown(
        &self,
        stats: &TeamStats,
        home_team: &str,
        away_team: &str,
    ) -> Result<EstimateBreakdown, ModelError> {
        let home = lookup(stats, home_team)?;
        let away = lookup(stats, away_team)?;

        let avg = self.params.league_average;
        let base = (or_fallback(home.avg_points_scored_at_home, avg)
            + or_fallback(away.avg_points_scored_away, avg)
            + or_fallback(home.avg_points_allowed_at_home, avg)
            + or_fallback(away.avg_points_allowed_away, avg))
            / 2.0;

        let home_court = self.params.bonus_for(home_team);
        let total =
            (base + home_court) * self.params.total_multiplier + self.params.market_calibration;

        debug!(home_team, away_team, base, home_court, total, "estimate");

        Ok(EstimateBreakdown {
            base,
            home_court,
            multiplier: self.params.total_multiplier,
            calibration: self.params.market_calibration,
            total,
        })
    }
}

fn lookup<'a>(stats: &'a TeamStats, team: &str) -> Result<&'a TeamEfficiencyRow, ModelError> {
    stats
        .get(team)
        .ok_or_else(|| ModelError::TeamNotFound(team.to_string()))
}

/// Per-team home-court bonus learned from the training window.
///
/// `clamp(scored_at_home - scored_away, 0, 7)` for teams observed in both
/// roles; other teams are left out so the default bonus applies to them.
#[must_use]
pub fn derive_home_court_bonuses(stats: &TeamStats) -> HashMap<TeamId, f64> {
    stats
        .iter()
        .filter_map(|(team, row)| {
            let home = row.avg_points_scored_at_home?;
            let away = row.avg_points_scored_away?;
            let diff = home - away;
            diff.is_finite()
                .then(|| (team.clone(), diff.clamp(0.0, MAX_DERIVED_HOME_COURT)))
        })
        .collect()
}
