//! Recurring prediction pass over upcoming games.
//!
//! Every tick reloads the game log and calls each scheduled (0-0) game that
//! carries a market total, training on the played games listed before it.
//! Context is cached across ticks for `context.ttl_secs`.

use std::time::Duration;

use anyhow::Result;
use clap::Args;

use totals_core::{AdjustmentContext, AppConfig, GameRecord};
use totals_strategy::Predictor;

use super::predict::{format_prediction, predict_matchup, PredictReport};
use super::{print_json, DataArgs, ModelArgs, OutputFormat};

/// Arguments for the schedule command.
#[derive(Args, Debug, Clone)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub model: ModelArgs,

    /// Seconds between passes (default: daily)
    #[arg(long, default_value = "86400")]
    pub interval_secs: u64,

    /// Run a single pass and exit
    #[arg(long)]
    pub once: bool,

    /// Output format: text, json (default: text)
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Calls every upcoming game in `games`.
///
/// Games that cannot be called are logged and skipped.
pub fn upcoming_calls(
    config: &AppConfig,
    predictor: &Predictor,
    games: &[GameRecord],
    context: &AdjustmentContext,
) -> Vec<PredictReport> {
    games
        .iter()
        .enumerate()
        .filter(|(_, g)| !g.is_played())
        .filter_map(|(i, game)| {
            let market = game.market_total?;
            match predict_matchup(
                config,
                predictor,
                &games[..i],
                &game.home_team,
                &game.away_team,
                market,
                context,
            ) {
                Ok(report) => Some(report),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", game.matchup(), e);
                    None
                }
            }
        })
        .collect()
}

/// Runs the schedule command until interrupted, or once with `--once`.
///
/// # Errors
/// Returns an error if configuration cannot be loaded or output fails.
pub async fn run_schedule(args: ScheduleArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;

    let mut config = args.data.load_config()?;
    args.model.apply(&mut config);
    let predictor = Predictor::from_config(&config);
    let mut provider = super::context_provider(&config);

    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval_secs.max(1)));
    tracing::info!(
        "Starting prediction schedule (every {}s{})",
        args.interval_secs,
        if args.once { ", single pass" } else { "" }
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping schedule");
                break;
            }
        }

        let context = provider
            .as_mut()
            .map_or_else(AdjustmentContext::empty, |p| p.resolve());

        match args.data.load_games() {
            Ok(games) => {
                let reports = upcoming_calls(&config, &predictor, &games, &context);
                tracing::info!("Prediction pass complete: {} games called", reports.len());
                match format {
                    OutputFormat::Text => {
                        for report in &reports {
                            println!("{}", format_prediction(report));
                        }
                    }
                    OutputFormat::Json => print_json(&reports)?,
                }
            }
            Err(e) => tracing::error!("Prediction pass failed: {:#}", e),
        }

        if args.once {
            break;
        }
    }

    Ok(())
}
