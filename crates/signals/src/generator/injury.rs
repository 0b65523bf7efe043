//! Injury adjustment.
//!
//! Each listed injury costs its team points: named high-impact players carry
//! a fixed impact, everyone else a flat role-player impact. The team total is
//! damped when several stars are out at once and capped, and the signal
//! subtracts the average of both teams' lost points. Injuries never raise a
//! total.

use std::collections::HashMap;

use totals_core::{AdjustmentContext, AdjustmentSignal, ModelError};

/// Points lost for an injured player who is not on the impact table.
pub const ROLE_PLAYER_IMPACT: f64 = 1.5;

/// Maximum points a single team can lose to injuries.
pub const MAX_TEAM_IMPACT: f64 = 15.0;

/// Damping applied when two or more high-impact players are out.
pub const MULTI_STAR_DAMPING: f64 = 0.9;

/// Default high-impact player table (points lost when out).
#[must_use]
pub fn default_star_impacts() -> Vec<(String, f64)> {
    [
        ("Luka Doncic", 10.0),
        ("LeBron James", 10.0),
        ("Giannis Antetokounmpo", 10.0),
        ("Kevin Durant", 9.0),
        ("Jayson Tatum", 8.0),
        ("Stephen Curry", 9.0),
        ("Shai Gilgeous-Alexander", 8.0),
        ("Joel Embiid", 10.0),
        ("Damian Lillard", 8.0),
        ("Kawhi Leonard", 8.0),
        ("Jimmy Butler", 7.0),
        ("Anthony Davis", 9.0),
    ]
    .into_iter()
    .map(|(name, impact)| (name.to_string(), impact))
    .collect()
}

/// Subtracts the averaged injury impact of both teams.
#[derive(Debug, Clone)]
pub struct InjurySignal {
    /// Ordered so the first matching star wins, as listed.
    stars: Vec<(String, f64)>,
}

impl Default for InjurySignal {
    fn default() -> Self {
        Self::with_impacts(default_star_impacts())
    }
}

impl InjurySignal {
    /// Creates a signal with a custom high-impact player table.
    #[must_use]
    pub fn with_impacts(stars: Vec<(String, f64)>) -> Self {
        let stars = stars
            .into_iter()
            .map(|(name, impact)| (name.to_lowercase(), impact))
            .collect();
        Self { stars }
    }

    /// Points lost by one team, always in `[0, MAX_TEAM_IMPACT]`.
    #[must_use]
    pub fn team_impact(&self, entries: &[String]) -> f64 {
        let mut star_total = 0.0;
        let mut star_count = 0usize;
        let mut role_count = 0usize;

        for entry in entries {
            let name = player_name(entry).to_lowercase();
            match self.stars.iter().find(|(star, _)| name.contains(star.as_str())) {
                Some((_, impact)) => {
                    star_total += impact.max(0.0);
                    star_count += 1;
                }
                None => role_count += 1,
            }
        }

        let mut total = star_total + role_count as f64 * ROLE_PLAYER_IMPACT;
        if star_count >= 2 {
            total *= MULTI_STAR_DAMPING;
        }
        total.min(MAX_TEAM_IMPACT)
    }

    fn impact_for(&self, team: &str, injuries: &HashMap<String, Vec<String>>) -> f64 {
        injuries
            .get(team)
            .map_or(0.0, |entries| self.team_impact(entries))
    }
}

/// Strips the "(status)" suffix from an injury report entry.
fn player_name(entry: &str) -> &str {
    entry.split('(').next().unwrap_or_default().trim()
}

impl AdjustmentSignal for InjurySignal {
    fn delta(
        &self,
        home_team: &str,
        away_team: &str,
        _running_estimate: f64,
        ctx: &AdjustmentContext,
    ) -> Result<f64, ModelError> {
        let injuries = ctx
            .injuries
            .as_ref()
            .ok_or_else(|| ModelError::ExternalDataUnavailable("injury report".into()))?;

        let home = self.impact_for(home_team, injuries);
        let away = self.impact_for(away_team, injuries);
        Ok(-(home + away) / 2.0)
    }

    fn name(&self) -> &str {
        "injury"
    }
}
