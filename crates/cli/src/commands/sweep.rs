//! Total-multiplier sweep command.
//!
//! Each multiplier is an independent walk-forward run, fanned out across the
//! blocking pool and collected in the requested order.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Args;

use totals_backtest::{run_for_multiplier, BacktestConfig, SweepReport, DEFAULT_MULTIPLIERS};
use totals_core::{AdjustmentContext, GameRecord};

use super::{header, pct, print_json, section, write_json, DataArgs, ModelArgs, OutputFormat};

/// Arguments for the sweep command.
#[derive(Args, Debug, Clone)]
pub struct SweepArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub model: ModelArgs,

    /// Comma-separated multipliers (default: 0.95,0.98,1.0,1.02,1.05,1.08,1.1)
    #[arg(long, value_delimiter = ',')]
    pub multipliers: Vec<f64>,

    /// Output JSON report to file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format: text, json (default: text)
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Runs the sweep command.
///
/// # Errors
/// Returns an error if configuration or data cannot be loaded, a run fails,
/// or the report cannot be written.
pub async fn run_sweep(args: SweepArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;

    let mut app = args.data.load_config()?;
    args.model.apply(&mut app);

    let multipliers = if args.multipliers.is_empty() {
        DEFAULT_MULTIPLIERS.to_vec()
    } else {
        args.multipliers.clone()
    };
    if let Some(bad) = multipliers.iter().find(|m| !m.is_finite() || **m <= 0.0) {
        return Err(anyhow!("Invalid multiplier: {}", bad));
    }

    let games = args.data.load_games()?;
    let context = super::resolve_context(&app);
    let config = BacktestConfig::from(&app);

    tracing::info!(
        "Sweeping {} multipliers over {} games",
        multipliers.len(),
        games.len()
    );
    let report = sweep_parallel(games, config, context, &multipliers).await?;

    if let Some(best) = &report.best {
        tracing::info!(
            "Best multiplier {:.2}: {:.1}% over {} bets",
            best.multiplier,
            best.summary.win_rate * 100.0,
            best.summary.bets
        );
    }

    match format {
        OutputFormat::Text => println!("{}", format_sweep_report(&report)),
        OutputFormat::Json => print_json(&report)?,
    }
    if let Some(path) = &args.output {
        write_json(path, &report)?;
    }
    Ok(())
}

/// Runs one backtest per multiplier on the blocking pool.
///
/// # Errors
/// Returns an error if any run fails or a task panics.
pub async fn sweep_parallel(
    games: Vec<GameRecord>,
    config: BacktestConfig,
    context: AdjustmentContext,
    multipliers: &[f64],
) -> Result<SweepReport> {
    let games = Arc::new(games);
    let config = Arc::new(config);
    let context = Arc::new(context);

    let handles: Vec<_> = multipliers
        .iter()
        .map(|&multiplier| {
            let games = Arc::clone(&games);
            let config = Arc::clone(&config);
            let context = Arc::clone(&context);
            tokio::task::spawn_blocking(move || {
                run_for_multiplier(&games, &config, multiplier, &context)
            })
        })
        .collect();

    let mut rows = Vec::with_capacity(handles.len());
    for handle in handles {
        rows.push(handle.await??);
    }
    Ok(SweepReport::from_rows(rows))
}

/// Formats a sweep as a text table.
pub fn format_sweep_report(report: &SweepReport) -> String {
    let mut output = String::new();
    header(&mut output, "MULTIPLIER SWEEP");

    section(&mut output, "MULT    BETS   WINS  WIN RATE   UNITS   FILTERED");
    for row in &report.rows {
        let s = &row.summary;
        let marker = match &report.best {
            Some(best) if best.multiplier == row.multiplier => " *",
            _ => "",
        };
        output.push_str(&format!(
            "{:<6.2}{:>6}{:>7}{:>10}{:>8.2}{:>11}{}\n",
            row.multiplier,
            s.bets,
            s.wins,
            pct(s.win_rate),
            s.units_f64(),
            s.filtered,
            marker
        ));
    }
    output.push('\n');

    output.push_str(super::RULE);
    match &report.best {
        Some(best) => output.push_str(&format!(
            "BEST: {:.2} ({} over {} bets)\n",
            best.multiplier,
            pct(best.summary.win_rate),
            best.summary.bets
        )),
        None => output.push_str("BEST: none (no bets)\n"),
    }
    output.push_str(super::RULE);

    output
}
