use chrono::NaiveDate;
use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

use totals_core::GameRecord;

use crate::error::DataFileError;

/// Game log row.
///
/// Format: date,home,away,home_pts,away_pts,market_total
/// (`market_total` may be empty).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct GameRow {
    date: NaiveDate,
    home: String,
    away: String,
    home_pts: u32,
    away_pts: u32,
    market_total: Option<f64>,
}

impl From<GameRow> for GameRecord {
    fn from(row: GameRow) -> Self {
        Self::new(row.date, row.home, row.away, row.home_pts, row.away_pts, row.market_total)
    }
}

impl From<&GameRecord> for GameRow {
    fn from(game: &GameRecord) -> Self {
        Self {
            date: game.date,
            home: game.home_team.clone(),
            away: game.away_team.clone(),
            home_pts: game.home_points,
            away_pts: game.away_points,
            market_total: game.market_total,
        }
    }
}

pub struct CsvStorage;

impl CsvStorage {
    /// Reads a game log in file order.
    ///
    /// Rows are NOT sorted; ordering is checked by the model, which rejects
    /// unordered logs.
    ///
    /// # Errors
    /// Returns error if the file cannot be opened, a row fails to parse, or a
    /// market total is not finite.
    pub fn load_games(path: impl AsRef<Path>) -> Result<Vec<GameRecord>, DataFileError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DataFileError::io(path.display().to_string(), e))?;
        let games = Self::read_games(file)?;
        debug!(path = %path.display(), games = games.len(), "loaded game log");
        Ok(games)
    }

    /// Reads a game log from any reader.
    ///
    /// # Errors
    /// Returns error if a row fails to parse or has a non-finite market total.
    pub fn read_games<R: Read>(reader: R) -> Result<Vec<GameRecord>, DataFileError> {
        let mut reader = Reader::from_reader(reader);
        let mut games = Vec::new();

        for (idx, result) in reader.deserialize::<GameRow>().enumerate() {
            let row = result?;
            if row.market_total.is_some_and(|m| !m.is_finite()) {
                return Err(DataFileError::InvalidRow {
                    row: idx + 1,
                    message: "market_total is not a finite number".to_string(),
                });
            }
            games.push(GameRecord::from(row));
        }

        Ok(games)
    }

    /// Writes a game log in the same format `load_games` reads.
    ///
    /// # Errors
    /// Returns error if the file cannot be created or writing fails.
    pub fn write_games(path: impl AsRef<Path>, games: &[GameRecord]) -> Result<(), DataFileError> {
        let path = path.as_ref();
        let file =
            File::create(path).map_err(|e| DataFileError::io(path.display().to_string(), e))?;
        Self::write_games_to(file, games)
    }

    /// # Errors
    /// Returns error if serialization or writing fails.
    pub fn write_games_to<W: Write>(writer: W, games: &[GameRecord]) -> Result<(), DataFileError> {
        let mut writer = Writer::from_writer(writer);
        for game in games {
            writer.serialize(GameRow::from(game))?;
        }
        writer.flush().map_err(|e| DataFileError::io("<writer>", e))?;
        Ok(())
    }

    /// Writes any serializable rows (e.g. backtest outcomes) with a header.
    ///
    /// # Errors
    /// Returns error if the file cannot be created or writing fails.
    pub fn write_records<T: Serialize>(
        path: impl AsRef<Path>,
        rows: &[T],
    ) -> Result<(), DataFileError> {
        let path = path.as_ref();
        let file =
            File::create(path).map_err(|e| DataFileError::io(path.display().to_string(), e))?;
        let mut writer = Writer::from_writer(file);
        for row in rows {
            writer.serialize(row)?;
        }
        writer
            .flush()
            .map_err(|e| DataFileError::io(path.display().to_string(), e))?;
        debug!(path = %path.display(), rows = rows.len(), "wrote csv");
        Ok(())
    }
}
