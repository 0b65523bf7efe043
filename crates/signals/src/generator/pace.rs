//! Pace adjustment.
//!
//! Faster teams produce more possessions and therefore more points. The
//! signal averages both teams' pace index and converts the distance from
//! the league baseline into points.

use totals_core::{AdjustmentContext, AdjustmentSignal, ModelError};

/// League baseline pace index.
pub const LEAGUE_BASELINE_PACE: f64 = 100.0;

/// Default points added per pace unit above baseline.
pub const DEFAULT_POINTS_PER_PACE_UNIT: f64 = 0.4;

/// Adjusts the total by `(avg_pace - 100) * points_per_unit`.
#[derive(Debug, Clone)]
pub struct PaceSignal {
    points_per_unit: f64,
}

impl Default for PaceSignal {
    fn default() -> Self {
        Self::new(DEFAULT_POINTS_PER_PACE_UNIT)
    }
}

impl PaceSignal {
    #[must_use]
    pub fn new(points_per_unit: f64) -> Self {
        Self { points_per_unit }
    }
}

/// Pace delta for a matchup given each team's pace index.
///
/// A team absent from the map is treated as playing at the league baseline.
#[must_use]
pub fn pace_adjustment(
    home_pace: Option<f64>,
    away_pace: Option<f64>,
    points_per_unit: f64,
) -> f64 {
    let home = home_pace.unwrap_or(LEAGUE_BASELINE_PACE);
    let away = away_pace.unwrap_or(LEAGUE_BASELINE_PACE);
    ((home + away) / 2.0 - LEAGUE_BASELINE_PACE) * points_per_unit
}

impl AdjustmentSignal for PaceSignal {
    fn delta(
        &self,
        home_team: &str,
        away_team: &str,
        _running_estimate: f64,
        ctx: &AdjustmentContext,
    ) -> Result<f64, ModelError> {
        let pace = ctx
            .pace
            .as_ref()
            .ok_or_else(|| ModelError::ExternalDataUnavailable("pace index".into()))?;

        Ok(pace_adjustment(
            pace.get(home_team).copied(),
            pace.get(away_team).copied(),
            self.points_per_unit,
        ))
    }

    fn name(&self) -> &str {
        "pace"
    }
}
