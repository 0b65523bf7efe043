//! Form (win/loss record) adjustment.

use totals_core::{AdjustmentContext, AdjustmentSignal, ModelError, TeamRecord};

/// Win percentage above which a team counts as hot.
pub const HOT_WIN_PCT: f64 = 0.55;
/// Win percentage below which a team counts as cold.
pub const COLD_WIN_PCT: f64 = 0.45;
/// Points added (hot) or removed (cold) per team.
pub const STREAK_POINTS: f64 = 0.75;

/// Adds points for hot teams and removes them for cold ones.
///
/// Range is `[-1.5, +1.5]` for a matchup.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakSignal;

/// Per-team form contribution; zero for unknown or empty records.
#[must_use]
pub fn team_form(record: Option<&TeamRecord>) -> f64 {
    match record.and_then(TeamRecord::win_pct) {
        Some(pct) if pct > HOT_WIN_PCT => STREAK_POINTS,
        Some(pct) if pct < COLD_WIN_PCT => -STREAK_POINTS,
        _ => 0.0,
    }
}

impl AdjustmentSignal for StreakSignal {
    fn delta(
        &self,
        home_team: &str,
        away_team: &str,
        _running_estimate: f64,
        ctx: &AdjustmentContext,
    ) -> Result<f64, ModelError> {
        let records = ctx
            .records
            .as_ref()
            .ok_or_else(|| ModelError::ExternalDataUnavailable("team records".into()))?;

        Ok(team_form(records.get(home_team)) + team_form(records.get(away_team)))
    }

    fn name(&self) -> &str {
        "streak"
    }
}
