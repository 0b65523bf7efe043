//! CLI commands for the totals model.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde::Serialize;

use totals_core::{AdjustmentContext, AppConfig, ConfigLoader, GameRecord};
use totals_data::{fallback_games, generate_games, CsvStorage, FileContextProvider, SyntheticConfig};
use totals_signals::CachedContextProvider;

pub mod backtest;
pub mod predict;
pub mod sample;
pub mod schedule;
pub mod sweep;

pub use backtest::{run_backtest, BacktestArgs};
pub use predict::{run_predict, PredictArgs};
pub use sample::{run_sample, SampleArgs};
pub use schedule::{run_schedule, ScheduleArgs};
pub use sweep::{run_sweep, SweepArgs};

pub(crate) const RULE: &str = "===============================================================\n";
pub(crate) const THIN_RULE: &str =
    "---------------------------------------------------------------\n";

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Parses an output format from string.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!(
                "Unknown format: '{}'. Valid formats: text, json",
                s
            )),
        }
    }
}

/// Where games, configuration and context come from.
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Game log CSV (date,home,away,home_pts,away_pts,market_total)
    #[arg(long, conflicts_with = "synthetic")]
    pub games: Option<PathBuf>,

    /// Generate a synthetic league with this many games instead of reading a log
    #[arg(long)]
    pub synthetic: Option<usize>,

    /// Seed for the synthetic generator
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Adjustment context JSON (pace, injuries, records); overrides context.path
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,
}

impl DataArgs {
    /// Loads layered configuration and applies the context override.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = ConfigLoader::load_from(&self.config)
            .with_context(|| format!("Failed to load config from {}", self.config))?;
        if let Some(path) = &self.context {
            config.context.path = Some(path.display().to_string());
        }
        Ok(config)
    }

    /// Loads the game log, the synthetic league, or the built-in fallback.
    pub fn load_games(&self) -> Result<Vec<GameRecord>> {
        let games = if let Some(path) = &self.games {
            CsvStorage::load_games(path)
                .with_context(|| format!("Failed to load game log {}", path.display()))?
        } else if let Some(count) = self.synthetic {
            generate_games(
                &SyntheticConfig::default()
                    .with_games(count)
                    .with_seed(self.seed),
            )?
        } else {
            tracing::info!("No game log given, using the built-in fallback games");
            fallback_games()
        };

        tracing::info!("Loaded {} games", games.len());
        Ok(games)
    }
}

/// Model overrides shared by the backtest-style commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ModelArgs {
    /// Played games required before a game is evaluated
    #[arg(long)]
    pub min_training: Option<usize>,

    /// Weight the most recent third of each training window 3x
    #[arg(long)]
    pub recency: bool,

    /// Derive per-team home-court bonuses from each training window
    #[arg(long)]
    pub team_home_court: bool,

    /// Divergence from the market above which a call is filtered
    #[arg(long)]
    pub outlier_threshold: Option<f64>,

    /// Minimum absolute edge for a bet; smaller calls pass
    #[arg(long)]
    pub min_edge: Option<f64>,
}

impl ModelArgs {
    /// Applies the overrides on top of loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(min) = self.min_training {
            config.backtest.min_training_games = min;
        }
        if self.recency {
            config.model.recency_weighting = true;
        }
        if self.team_home_court {
            config.model.team_home_court = true;
        }
        if let Some(threshold) = self.outlier_threshold {
            config.edge.outlier_threshold = threshold;
        }
        if let Some(min_edge) = self.min_edge {
            config.edge.min_edge = min_edge;
        }
    }
}

/// Context provider for the configured file, if any.
pub fn context_provider(config: &AppConfig) -> Option<CachedContextProvider<FileContextProvider>> {
    config.context.path.as_ref().map(|path| {
        CachedContextProvider::from_config(FileContextProvider::new(path), &config.context)
    })
}

/// Resolves adjustment context once; empty when no file is configured.
pub fn resolve_context(config: &AppConfig) -> AdjustmentContext {
    context_provider(config).map_or_else(AdjustmentContext::empty, |mut provider| {
        provider.resolve()
    })
}

/// Writes `value` as pretty JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Results written to {}", path.display());
    Ok(())
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn header(output: &mut String, title: &str) {
    output.push('\n');
    output.push_str(RULE);
    output.push_str(&format!("{:^63}\n", title));
    output.push_str(RULE);
}

pub(crate) fn section(output: &mut String, title: &str) {
    output.push_str(title);
    output.push('\n');
    output.push_str(THIN_RULE);
}

pub(crate) fn pct(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================
    // OutputFormat Tests
    // ============================================

    #[test]
    fn output_format_parse_text() {
        assert_eq!(OutputFormat::parse("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::parse("TEXT").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::parse("txt").unwrap(), OutputFormat::Text);
    }

    #[test]
    fn output_format_parse_json() {
        assert_eq!(OutputFormat::parse("json").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("JSON").unwrap(), OutputFormat::Json);
    }

    #[test]
    fn output_format_parse_invalid() {
        assert!(OutputFormat::parse("xml").is_err());
        assert!(OutputFormat::parse("").is_err());
    }

    // ============================================
    // Argument Plumbing Tests
    // ============================================

    fn data_args() -> DataArgs {
        DataArgs {
            games: None,
            synthetic: None,
            seed: 42,
            context: None,
            config: "does/not/exist.toml".to_string(),
        }
    }

    #[test]
    fn model_args_override_config() {
        let mut config = AppConfig::default();
        let args = ModelArgs {
            min_training: Some(25),
            recency: true,
            team_home_court: false,
            outlier_threshold: Some(9.0),
            min_edge: Some(1.5),
        };
        args.apply(&mut config);

        assert_eq!(config.backtest.min_training_games, 25);
        assert!(config.model.recency_weighting);
        assert!(!config.model.team_home_court);
        assert_eq!(config.edge.outlier_threshold, 9.0);
        assert_eq!(config.edge.min_edge, 1.5);
    }

    #[test]
    fn empty_model_args_change_nothing() {
        let mut config = AppConfig::default();
        ModelArgs::default().apply(&mut config);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn fallback_games_without_a_source() {
        let games = data_args().load_games().unwrap();
        assert_eq!(games, fallback_games());
    }

    #[test]
    fn synthetic_games_use_seed() {
        let args = DataArgs {
            synthetic: Some(50),
            ..data_args()
        };
        let games = args.load_games().unwrap();
        assert_eq!(games.len(), 50);
        assert_eq!(games, args.load_games().unwrap());
    }

    #[test]
    fn games_from_csv() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("games.csv");
        CsvStorage::write_games(&path, &fallback_games()).unwrap();

        let args = DataArgs {
            games: Some(path),
            ..data_args()
        };
        assert_eq!(args.load_games().unwrap(), fallback_games());
    }

    #[test]
    fn missing_context_file_resolves_empty() {
        let mut config = AppConfig::default();
        config.context.path = Some("no/such/context.json".to_string());
        assert_eq!(resolve_context(&config), AdjustmentContext::empty());
        assert!(context_provider(&AppConfig::default()).is_none());
    }

    #[test]
    fn percent_formatting() {
        assert_eq!(pct(0.5238), "52.4%");
        assert_eq!(pct(0.0), "0.0%");
    }
}
