//! Built-in game log used when no data file is supplied.
//!
//! 31 games from 2025-11-23 to 2025-11-30 with closing totals.

use chrono::NaiveDate;

use totals_core::GameRecord;

// (date, home, away, home_pts, away_pts, market_total)
const GAMES: &[(&str, &str, &str, u32, u32, f64)] = &[
    ("2025-11-23", "Boston Celtics", "Denver Nuggets", 107, 115, 220.5),
    ("2025-11-23", "New York Knicks", "Golden State Warriors", 112, 117, 226.5),
    ("2025-11-23", "Phoenix Suns", "Los Angeles Lakers", 118, 116, 232.0),
    ("2025-11-24", "Denver Nuggets", "Boston Celtics", 113, 111, 224.0),
    ("2025-11-24", "Golden State Warriors", "Miami Heat", 116, 103, 217.0),
    ("2025-11-24", "Los Angeles Lakers", "Phoenix Suns", 115, 117, 229.0),
    ("2025-11-24", "Milwaukee Bucks", "Chicago Bulls", 112, 101, 224.5),
    ("2025-11-25", "New York Knicks", "Boston Celtics", 110, 105, 219.5),
    ("2025-11-25", "Phoenix Suns", "Golden State Warriors", 118, 112, 227.5),
    ("2025-11-25", "Los Angeles Lakers", "Denver Nuggets", 102, 100, 221.0),
    ("2025-11-25", "Miami Heat", "Milwaukee Bucks", 102, 108, 215.5),
    ("2025-11-26", "Golden State Warriors", "Phoenix Suns", 114, 110, 222.0),
    ("2025-11-26", "Miami Heat", "Boston Celtics", 103, 109, 217.0),
    ("2025-11-26", "Memphis Grizzlies", "Los Angeles Lakers", 118, 116, 231.0),
    ("2025-11-26", "Chicago Bulls", "Denver Nuggets", 108, 114, 219.0),
    ("2025-11-27", "Phoenix Suns", "Miami Heat", 119, 107, 224.0),
    ("2025-11-27", "Boston Celtics", "Milwaukee Bucks", 109, 111, 219.5),
    ("2025-11-27", "Los Angeles Lakers", "New York Knicks", 117, 115, 229.5),
    ("2025-11-27", "Denver Nuggets", "Chicago Bulls", 105, 103, 219.5),
    ("2025-11-28", "Miami Heat", "Denver Nuggets", 104, 112, 220.5),
    ("2025-11-28", "Los Angeles Lakers", "Boston Celtics", 116, 119, 233.0),
    ("2025-11-28", "Milwaukee Bucks", "Phoenix Suns", 108, 107, 225.5),
    ("2025-11-28", "Golden State Warriors", "Denver Nuggets", 113, 115, 226.0),
    ("2025-11-29", "Boston Celtics", "Los Angeles Lakers", 111, 109, 221.0),
    ("2025-11-29", "Denver Nuggets", "Golden State Warriors", 115, 111, 223.5),
    ("2025-11-29", "Miami Heat", "New York Knicks", 106, 110, 216.5),
    ("2025-11-29", "Phoenix Suns", "Memphis Grizzlies", 114, 109, 221.0),
    ("2025-11-30", "Boston Celtics", "Miami Heat", 117, 108, 224.5),
    ("2025-11-30", "Golden State Warriors", "Los Angeles Lakers", 112, 106, 222.5),
    ("2025-11-30", "Denver Nuggets", "Phoenix Suns", 110, 108, 219.0),
    ("2025-11-30", "Milwaukee Bucks", "Chicago Bulls", 118, 104, 220.0),
];

/// The built-in log in ascending date order.
#[must_use]
pub fn fallback_games() -> Vec<GameRecord> {
    GAMES
        .iter()
        .filter_map(|&(date, home, away, hp, ap, market)| {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
            Some(GameRecord::new(date, home, away, hp, ap, Some(market)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use totals_core::validate_log;

    #[test]
    fn has_every_game() {
        assert_eq!(fallback_games().len(), 31);
    }

    #[test]
    fn is_a_valid_chronological_log() {
        let games = fallback_games();
        validate_log(&games).unwrap();
        assert_eq!(games.first().unwrap().date.to_string(), "2025-11-23");
        assert_eq!(games.last().unwrap().date.to_string(), "2025-11-30");
    }

    #[test]
    fn every_game_is_played_with_a_market() {
        assert!(fallback_games()
            .iter()
            .all(|g| g.is_played() && g.market_total.is_some()));
    }
}
