//! Team efficiency aggregation.
//!
//! Reduces a chronological game log to per-team scoring averages split by
//! home/away role. With recency weighting enabled (and more than ten games in
//! the window) the log is cut once at `n - n/3`: games at or after the cut
//! weigh 3.0, earlier games 1.0. This is a single step, not a sliding or
//! exponential decay.

use std::collections::HashMap;
use tracing::debug;

use totals_core::{validate_log, GameRecord, ModelError, TeamEfficiencyRow, TeamStats};

/// Weight of a game in the recent partition relative to older games.
pub const RECENT_GAME_WEIGHT: f64 = 3.0;

/// Recency weighting only kicks in above this many games.
pub const RECENCY_MIN_GAMES: usize = 10;

/// Index of the first game in the recent partition for a window of `n` games.
#[must_use]
pub const fn recency_split(n: usize) -> usize {
    n.saturating_sub(n / 3)
}

#[derive(Default)]
struct RoleAccumulator {
    scored: f64,
    allowed: f64,
    weight: f64,
    games: u32,
}

impl RoleAccumulator {
    fn add(&mut self, scored: u32, allowed: u32, weight: f64) {
        self.scored += f64::from(scored) * weight;
        self.allowed += f64::from(allowed) * weight;
        self.weight += weight;
        self.games += 1;
    }

    fn means(&self) -> (Option<f64>, Option<f64>) {
        if self.games == 0 || self.weight <= 0.0 {
            return (None, None);
        }
        (Some(self.scored / self.weight), Some(self.allowed / self.weight))
    }
}

#[derive(Default)]
struct TeamAccumulator {
    home: RoleAccumulator,
    away: RoleAccumulator,
}

impl TeamAccumulator {
    fn finish(&self) -> TeamEfficiencyRow {
        let (scored_home, allowed_home) = self.home.means();
        let (scored_away, allowed_away) = self.away.means();
        TeamEfficiencyRow {
            avg_points_scored_at_home: scored_home,
            avg_points_allowed_at_home: allowed_home,
            avg_points_scored_away: scored_away,
            avg_points_allowed_away: allowed_away,
            home_games: self.home.games,
            away_games: self.away.games,
        }
    }
}

/// Builds team efficiency rows from a training window.
///
/// Unplayed (0-0) games are ignored but keep their position for the recency
/// split. Teams that never played are absent from the result.
///
/// # Errors
/// Returns [`ModelError::Data`] if `games` is not in ascending date order or
/// contains a malformed record. The input is never re-sorted.
pub fn aggregate(games: &[GameRecord], recency_weighting: bool) -> Result<TeamStats, ModelError> {
    validate_log(games)?;

    let n = games.len();
    let weighted = recency_weighting && n > RECENCY_MIN_GAMES;
    let split = recency_split(n);

    let mut teams: HashMap<&str, TeamAccumulator> = HashMap::new();
    for (idx, game) in games.iter().enumerate() {
        if !game.is_played() {
            continue;
        }
        let weight = if weighted && idx >= split {
            RECENT_GAME_WEIGHT
        } else {
            1.0
        };

        teams
            .entry(game.home_team.as_str())
            .or_default()
            .home
            .add(game.home_points, game.away_points, weight);
        teams
            .entry(game.away_team.as_str())
            .or_default()
            .away
            .add(game.away_points, game.home_points, weight);
    }

    debug!(games = n, teams = teams.len(), weighted, "aggregated team efficiency");

    Ok(teams
        .into_iter()
        .map(|(team, acc)| (team.to_string(), acc.finish()))
        .collect())
}

/// Stateful wrapper holding the weighting choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct EfficiencyAggregator {
    recency_weighting: bool,
}

impl EfficiencyAggregator {
    #[must_use]
    pub const fn new(recency_weighting: bool) -> Self {
        Self { recency_weighting }
    }

    #[must_use]
    pub const fn recency_weighting(&self) -> bool {
        self.recency_weighting
    }

    /// See [`aggregate`].
    ///
    /// # Errors
    /// Returns [`ModelError::Data`] for unordered or malformed input.
    pub fn aggregate(&self, games: &[GameRecord]) -> Result<TeamStats, ModelError> {
        aggregate(games, self.recency_weighting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    fn game(d: u32, home: &str, away: &str, hp: u32, ap: u32) -> GameRecord {
        GameRecord::new(day(d), home, away, hp, ap, Some(220.0))
    }

    // ============================================================
    // Unweighted aggregation
    // ============================================================

    #[test]
    fn splits_by_role() {
        let games = vec![
            game(1, "A", "B", 110, 100),
            game(2, "B", "A", 104, 108),
            game(3, "A", "C", 120, 90),
        ];
        let stats = aggregate(&games, false).unwrap();

        let a = &stats["A"];
        assert_eq!(a.avg_points_scored_at_home, Some(115.0));
        assert_eq!(a.avg_points_allowed_at_home, Some(95.0));
        assert_eq!(a.avg_points_scored_away, Some(108.0));
        assert_eq!(a.avg_points_allowed_away, Some(104.0));
        assert_eq!((a.home_games, a.away_games), (2, 1));

        let c = &stats["C"];
        assert_eq!(c.avg_points_scored_at_home, None);
        assert_eq!(c.avg_points_scored_away, Some(90.0));
    }

    #[test]
    fn absent_team_has_no_row() {
        let stats = aggregate(&[game(1, "A", "B", 100, 100)], false).unwrap();
        assert!(!stats.contains_key("Z"));
        assert_eq!(stats.len(), 2);
    }

    #[test]
    fn unplayed_games_are_ignored() {
        let games = vec![
            game(1, "A", "B", 110, 100),
            GameRecord::scheduled(day(2), "A", "C", Some(220.0)),
        ];
        let stats = aggregate(&games, false).unwrap();
        assert!(!stats.contains_key("C"));
        assert_eq!(stats["A"].home_games, 1);
    }

    #[test]
    fn empty_input_gives_empty_stats() {
        assert!(aggregate(&[], true).unwrap().is_empty());
    }

    #[test]
    fn unsorted_input_is_rejected_not_resorted() {
        let games = vec![game(5, "A", "B", 110, 100), game(4, "C", "D", 100, 100)];
        assert!(matches!(aggregate(&games, false), Err(ModelError::Data(_))));
    }

    // ============================================================
    // Recency weighting
    // ============================================================

    #[test]
    fn recency_split_point() {
        assert_eq!(recency_split(12), 8);
        assert_eq!(recency_split(11), 8);
        assert_eq!(recency_split(30), 20);
        assert_eq!(recency_split(0), 0);
    }

    #[test]
    fn recency_ignored_at_ten_games_or_fewer() {
        let games: Vec<GameRecord> = (1..=10).map(|d| game(d, "A", "B", 100 + d, 100)).collect();
        assert_eq!(aggregate(&games, true).unwrap(), aggregate(&games, false).unwrap());
    }

    #[test]
    fn recent_third_weighs_three_times() {
        // 12 games: indices 0..8 score 100 at home, indices 8..12 score 120.
        let games: Vec<GameRecord> = (0..12u32)
            .map(|i| {
                let pts = if i >= 8 { 120 } else { 100 };
                game(i + 1, "A", "B", pts, 100)
            })
            .collect();

        let flat = aggregate(&games, false).unwrap();
        let weighted = aggregate(&games, true).unwrap();

        let flat_mean = (8.0 * 100.0 + 4.0 * 120.0) / 12.0;
        let weighted_mean = (8.0 * 100.0 + 3.0 * 4.0 * 120.0) / (8.0 + 12.0);
        assert!((flat["A"].avg_points_scored_at_home.unwrap() - flat_mean).abs() < 1e-9);
        assert!((weighted["A"].avg_points_scored_at_home.unwrap() - weighted_mean).abs() < 1e-9);
        assert!((weighted["B"].avg_points_allowed_away.unwrap() - weighted_mean).abs() < 1e-9);
    }

    #[test]
    fn aggregator_wrapper_delegates() {
        let games = vec![game(1, "A", "B", 110, 100)];
        let agg = EfficiencyAggregator::new(true);
        assert!(agg.recency_weighting());
        assert_eq!(agg.aggregate(&games).unwrap(), aggregate(&games, true).unwrap());
    }
}
