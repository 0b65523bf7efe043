//! Adjustment signal traits and context types.
//!
//! An adjustment signal refines a running total estimate with one situational
//! factor (pace, injuries, form). Signals are stateless with respect to each
//! other and return an additive point delta, so any set of them composes as a
//! plain sum.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ModelError;
use crate::game::TeamId;

/// Season win/loss record for one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub wins: u32,
    pub losses: u32,
}

impl TeamRecord {
    #[must_use]
    pub const fn new(wins: u32, losses: u32) -> Self {
        Self { wins, losses }
    }

    #[must_use]
    pub const fn games(&self) -> u32 {
        self.wins + self.losses
    }

    /// Win percentage, or `None` before the first game.
    #[must_use]
    pub fn win_pct(&self) -> Option<f64> {
        match self.games() {
            0 => None,
            n => Some(f64::from(self.wins) / f64::from(n)),
        }
    }
}

/// Optional external data consumed by adjustment signals.
///
/// Every section is independently optional. A missing section means the
/// collaborator could not supply it, which is different from an empty map
/// (supplied, but no entries).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentContext {
    /// Team pace index (league baseline 100.0).
    #[serde(default)]
    pub pace: Option<HashMap<TeamId, f64>>,
    /// Injury report entries per team, formatted "Player Name (status)".
    #[serde(default)]
    pub injuries: Option<HashMap<TeamId, Vec<String>>>,
    /// Current win/loss record per team.
    #[serde(default)]
    pub records: Option<HashMap<TeamId, TeamRecord>>,
}

impl AdjustmentContext {
    /// Context with no external data; every signal degrades to zero.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_pace(mut self, pace: HashMap<TeamId, f64>) -> Self {
        self.pace = Some(pace);
        self
    }

    #[must_use]
    pub fn with_injuries(mut self, injuries: HashMap<TeamId, Vec<String>>) -> Self {
        self.injuries = Some(injuries);
        self
    }

    #[must_use]
    pub fn with_records(mut self, records: HashMap<TeamId, TeamRecord>) -> Self {
        self.records = Some(records);
        self
    }

    /// Returns true if no section was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pace.is_none() && self.injuries.is_none() && self.records.is_none()
    }

    /// Overlays the sections present in `other` onto this context.
    #[must_use]
    pub fn merged(mut self, other: Self) -> Self {
        if other.pace.is_some() {
            self.pace = other.pace;
        }
        if other.injuries.is_some() {
            self.injuries = other.injuries;
        }
        if other.records.is_some() {
            self.records = other.records;
        }
        self
    }
}

/// A pluggable total adjustment.
///
/// Implementations must be pure functions of their inputs. When the context
/// section they need is missing they return
/// [`ModelError::ExternalDataUnavailable`]; the pipeline turns that into a
/// zero delta.
pub trait AdjustmentSignal: Send + Sync {
    /// Computes the additive point delta for a matchup.
    ///
    /// # Errors
    /// Returns [`ModelError::ExternalDataUnavailable`] if required context is
    /// missing.
    fn delta(
        &self,
        home_team: &str,
        away_team: &str,
        running_estimate: f64,
        ctx: &AdjustmentContext,
    ) -> Result<f64, ModelError>;

    /// Stable name used in logs and stage breakdowns.
    fn name(&self) -> &str;
}
