//! Single-game prediction command.
//!
//! Trains on the whole played history and calls one matchup against a market
//! total, without the walk-forward harness.

use anyhow::{anyhow, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use totals_core::{AdjustmentContext, AppConfig, GameRecord};
use totals_strategy::{line_movement, LineMovement, MatchupCall, Predictor};

use super::{header, print_json, section, DataArgs, ModelArgs, OutputFormat};

/// Arguments for the predict command.
#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub model: ModelArgs,

    /// Home team
    #[arg(long)]
    pub home: String,

    /// Away team
    #[arg(long)]
    pub away: String,

    /// Market total (defaults to edge.default_line)
    #[arg(long)]
    pub market: Option<f64>,

    /// Total multiplier (defaults to model.total_multiplier)
    #[arg(long)]
    pub multiplier: Option<f64>,

    /// Output format: text, json (default: text)
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// A matchup call with its training window and line movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictReport {
    pub call: MatchupCall,
    /// Played games the model trained on.
    pub training_games: usize,
    pub reference_line: f64,
    /// `market - reference_line`.
    pub line_movement: f64,
    pub movement: LineMovement,
}

/// Calls one matchup from `history`.
///
/// # Errors
/// Returns an error if the history has fewer played games than
/// `backtest.min_training_games`, is unordered, or lacks either team.
pub fn predict_matchup(
    config: &AppConfig,
    predictor: &Predictor,
    history: &[GameRecord],
    home_team: &str,
    away_team: &str,
    market_total: f64,
    context: &AdjustmentContext,
) -> Result<PredictReport> {
    let training_games = history.iter().filter(|g| g.is_played()).count();
    if training_games < config.backtest.min_training_games {
        return Err(anyhow!(
            "Only {} played games in history, need at least {}",
            training_games,
            config.backtest.min_training_games
        ));
    }

    let call = predictor.call_from_history(
        history,
        config.model.recency_weighting,
        home_team,
        away_team,
        market_total,
        context,
    )?;
    let reference_line = config.edge.default_line;
    let (movement_pts, movement) = line_movement(reference_line, market_total);

    Ok(PredictReport {
        call,
        training_games,
        reference_line,
        line_movement: movement_pts,
        movement,
    })
}

/// Runs the predict command.
///
/// # Errors
/// Returns an error if configuration or data cannot be loaded or the matchup
/// cannot be called.
pub async fn run_predict(args: PredictArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;

    let mut config = args.data.load_config()?;
    args.model.apply(&mut config);
    if let Some(multiplier) = args.multiplier {
        config.model.total_multiplier = multiplier;
    }

    let games = args.data.load_games()?;
    let context = super::resolve_context(&config);
    let market = args.market.unwrap_or(config.edge.default_line);
    let predictor = Predictor::from_config(&config);

    tracing::info!("Predicting {} vs {} (market {:.1})", args.home, args.away, market);
    let report = predict_matchup(
        &config, &predictor, &games, &args.home, &args.away, market, &context,
    )?;

    match format {
        OutputFormat::Text => println!("{}", format_prediction(&report)),
        OutputFormat::Json => print_json(&report)?,
    }
    Ok(())
}

/// Formats a prediction as a text report.
pub fn format_prediction(report: &PredictReport) -> String {
    let call = &report.call;
    let p = &call.prediction;
    let mut output = String::new();

    header(
        &mut output,
        &format!("{} vs {}", p.home_team, p.away_team),
    );
    output.push_str(&format!("Training Games: {}\n", report.training_games));
    output.push('\n');

    section(&mut output, "ESTIMATE");
    output.push_str(&format!("Base:           {:.2}\n", p.estimate.base));
    output.push_str(&format!("Home Court:     {:+.2}\n", p.estimate.home_court));
    output.push_str(&format!("Multiplier:     x{:.3}\n", p.estimate.multiplier));
    output.push_str(&format!("Calibration:    {:+.2}\n", p.estimate.calibration));
    for stage in &p.adjustments {
        let note = if stage.available { "" } else { " (no data)" };
        output.push_str(&format!(
            "{:<16}{:+.2}{}\n",
            format!("{}:", capitalize(&stage.name)),
            stage.delta,
            note
        ));
    }
    output.push_str(&format!("Predicted:      {:.1}\n", p.predicted_total));
    output.push('\n');

    section(&mut output, "MARKET");
    output.push_str(&format!("Market Total:   {:.1}\n", call.market_total));
    output.push_str(&format!("Edge:           {:+.2}\n", call.decision.edge));
    output.push_str(&format!(
        "Line Movement:  {:+.1} vs {:.1} ({})\n",
        report.line_movement, report.reference_line, report.movement
    ));
    output.push('\n');

    output.push_str(super::RULE);
    output.push_str(&format!("CALL: {}\n", call.label()));
    output.push_str(super::RULE);

    output
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use totals_data::fallback_games;

    fn call(market: f64) -> PredictReport {
        let config = AppConfig::default();
        predict_matchup(
            &config,
            &Predictor::from_config(&config),
            &fallback_games(),
            "Boston Celtics",
            "Denver Nuggets",
            market,
            &AdjustmentContext::empty(),
        )
        .unwrap()
    }

    // ============================================
    // Prediction Tests
    // ============================================

    #[test]
    fn edge_matches_predicted_minus_market() {
        let report = call(224.5);
        let predicted = report.call.prediction.predicted_total;
        assert_eq!(report.training_games, fallback_games().len());
        assert!((report.call.decision.edge - (predicted - 224.5)).abs() < 0.005);
    }

    #[test]
    fn movement_against_default_line() {
        let up = call(225.5);
        assert_eq!(up.movement, LineMovement::Up);
        assert!((up.line_movement - 5.0).abs() < 1e-9);

        let flat = call(221.0);
        assert_eq!(flat.movement, LineMovement::None);
    }

    #[test]
    fn short_history_is_rejected() {
        let config = AppConfig::default();
        let history: Vec<GameRecord> = fallback_games().into_iter().take(3).collect();
        let result = predict_matchup(
            &config,
            &Predictor::from_config(&config),
            &history,
            "Boston Celtics",
            "Denver Nuggets",
            220.5,
            &AdjustmentContext::empty(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn unknown_team_is_an_error() {
        let config = AppConfig::default();
        let result = predict_matchup(
            &config,
            &Predictor::from_config(&config),
            &fallback_games(),
            "Seattle SuperSonics",
            "Denver Nuggets",
            220.5,
            &AdjustmentContext::empty(),
        );
        assert!(result.is_err());
    }

    // ============================================
    // Report Tests
    // ============================================

    #[test]
    fn text_report_shows_call() {
        let report = call(224.5);
        let text = format_prediction(&report);
        assert!(text.contains("Boston Celtics vs Denver Nuggets"));
        assert!(text.contains(&format!("CALL: {}", report.call.label())));
        assert!(text.contains("Market Total:   224.5"));
    }

    #[test]
    fn capitalize_stage_names() {
        assert_eq!(capitalize("pace"), "Pace");
        assert_eq!(capitalize(""), "");
    }
}
