//! Game log records.
//!
//! A [`GameRecord`] is an immutable fact about one game. The chronological
//! log of records is the only input the model trains on, so ordering is
//! validated here and never repaired silently.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Team identifier, unique per league (e.g. "Boston Celtics").
pub type TeamId = String;

/// A single game result with its contemporaneous market total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Calendar date of the game (ordering only).
    pub date: NaiveDate,
    /// Home team identifier.
    pub home_team: TeamId,
    /// Away team identifier.
    pub away_team: TeamId,
    /// Points scored by the home team.
    pub home_points: u32,
    /// Points scored by the away team.
    pub away_points: u32,
    /// Market reference total for this game, if one was recorded.
    pub market_total: Option<f64>,
}

impl GameRecord {
    /// Creates a new game record.
    #[must_use]
    pub fn new(
        date: NaiveDate,
        home_team: impl Into<TeamId>,
        away_team: impl Into<TeamId>,
        home_points: u32,
        away_points: u32,
        market_total: Option<f64>,
    ) -> Self {
        Self {
            date,
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_points,
            away_points,
            market_total,
        }
    }

    /// Creates a scheduled game that has not been played yet (0-0 score).
    #[must_use]
    pub fn scheduled(
        date: NaiveDate,
        home_team: impl Into<TeamId>,
        away_team: impl Into<TeamId>,
        market_total: Option<f64>,
    ) -> Self {
        Self::new(date, home_team, away_team, 0, 0, market_total)
    }

    /// Combined score of both teams.
    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.home_points + self.away_points
    }

    /// Returns false for a scheduled game that has no result yet.
    #[must_use]
    pub fn is_played(&self) -> bool {
        self.home_points != 0 || self.away_points != 0
    }

    /// Returns true if the given team played in this game.
    #[must_use]
    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }

    /// Short "AWAY @ HOME" label for logs and reports.
    #[must_use]
    pub fn matchup(&self) -> String {
        format!("{} @ {}", self.away_team, self.home_team)
    }

    /// Checks the record on its own, independent of its neighbours.
    ///
    /// # Errors
    /// Returns [`ModelError::Data`] if a team identifier is empty, the same
    /// team is on both sides, or the market total is not a finite number.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.home_team.trim().is_empty() || self.away_team.trim().is_empty() {
            return Err(ModelError::Data(format!(
                "game on {} has an empty team identifier",
                self.date
            )));
        }
        if self.home_team == self.away_team {
            return Err(ModelError::Data(format!(
                "game on {} lists {} as both home and away",
                self.date, self.home_team
            )));
        }
        if let Some(market) = self.market_total {
            if !market.is_finite() || market < 0.0 {
                return Err(ModelError::Data(format!(
                    "game {} on {} has invalid market total {market}",
                    self.matchup(),
                    self.date
                )));
            }
        }
        Ok(())
    }
}

/// Verifies that `games` is sorted ascending by date.
///
/// Games on the same date are allowed in any order.
///
/// # Errors
/// Returns [`ModelError::Data`] naming the first out-of-order position.
pub fn ensure_chronological(games: &[GameRecord]) -> Result<(), ModelError> {
    for (idx, pair) in games.windows(2).enumerate() {
        if pair[1].date < pair[0].date {
            return Err(ModelError::Data(format!(
                "game log is not in ascending date order: index {} ({}) precedes index {} ({})",
                idx,
                pair[0].date,
                idx + 1,
                pair[1].date
            )));
        }
    }
    Ok(())
}

/// Validates every record and the ordering of the whole log.
///
/// # Errors
/// Returns the first [`ModelError::Data`] found.
pub fn validate_log(games: &[GameRecord]) -> Result<(), ModelError> {
    for game in games {
        game.validate()?;
    }
    ensure_chronological(games)
}
