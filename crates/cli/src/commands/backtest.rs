//! Walk-forward backtest command.
//!
//! Replays the game log once, training on every earlier game before each
//! prediction, and reports win rate, significance and units at -110.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rust_decimal::prelude::ToPrimitive;

use totals_backtest::{BacktestConfig, BacktestHarness, BacktestRun, BREAK_EVEN_WIN_RATE};
use totals_data::CsvStorage;

use super::{header, pct, print_json, section, write_json, DataArgs, ModelArgs, OutputFormat};

/// Arguments for the backtest command.
#[derive(Args, Debug, Clone)]
pub struct BacktestArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub model: ModelArgs,

    /// Total multiplier (defaults to model.total_multiplier)
    #[arg(long)]
    pub multiplier: Option<f64>,

    /// Write one CSV row per evaluated game
    #[arg(long)]
    pub outcomes: Option<PathBuf>,

    /// Output JSON summary to file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format: text, json (default: text)
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Runs the backtest command.
///
/// # Errors
/// Returns an error if configuration or data cannot be loaded, the log is
/// malformed, or an output file cannot be written.
pub async fn run_backtest(args: BacktestArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;

    let mut app = args.data.load_config()?;
    args.model.apply(&mut app);
    if let Some(multiplier) = args.multiplier {
        app.model.total_multiplier = multiplier;
    }

    let games = args.data.load_games()?;
    let context = super::resolve_context(&app);
    let config = BacktestConfig::from(&app);

    tracing::info!(
        "Running walk-forward backtest over {} games (multiplier {:.2}, min training {})",
        games.len(),
        config.model.total_multiplier,
        config.min_training_games
    );

    let run = BacktestHarness::new(config.clone())
        .with_context(context)
        .run(&games)?;

    tracing::info!(
        "Backtest complete: {} bets, {:.1}% win rate",
        run.summary.bets,
        run.summary.win_rate * 100.0
    );

    match format {
        OutputFormat::Text => println!("{}", format_text_report(&run, &config)),
        OutputFormat::Json => print_json(&run)?,
    }

    if let Some(path) = &args.outcomes {
        CsvStorage::write_records(path, &run.outcomes)?;
        tracing::info!("{} outcomes written to {}", run.outcomes.len(), path.display());
    }
    if let Some(path) = &args.output {
        write_json(path, &run.summary)?;
    }

    Ok(())
}

/// Formats a backtest run as a text report.
pub fn format_text_report(run: &BacktestRun, config: &BacktestConfig) -> String {
    let s = &run.summary;
    let mut output = String::new();

    header(&mut output, "WALK-FORWARD BACKTEST RESULTS");

    output.push_str(&format!("Run ID:         {}\n", run.run_id));
    if let (Some(first), Some(last)) = (run.outcomes.first(), run.outcomes.last()) {
        output.push_str(&format!("Period:         {} to {}\n", first.date, last.date));
    }
    output.push_str(&format!(
        "Multiplier:     {:.2}\n",
        config.model.total_multiplier
    ));
    let per_team = if config.model.team_home_court {
        " (per team)"
    } else {
        ""
    };
    output.push_str(&format!(
        "Home Court:     {:+.1}{}\n",
        config.model.home_court_bonus, per_team
    ));
    output.push_str(&format!(
        "Recency:        {}\n",
        if config.model.recency_weighting { "3x last third" } else { "off" }
    ));
    output.push_str(&format!("Outlier Filter: {:.1} pts\n", config.edge.outlier_threshold));
    output.push('\n');

    section(&mut output, "CORE METRICS");
    output.push_str(&format!("Evaluated:      {}\n", s.total_evaluated));
    output.push_str(&format!("Bets:           {}\n", s.bets));
    output.push_str(&format!("Wins:           {}\n", s.wins));
    output.push_str(&format!("Losses:         {}\n", s.losses));
    if s.pushes > 0 {
        output.push_str(&format!("Pushes:         {}\n", s.pushes));
    }
    if s.passes > 0 {
        output.push_str(&format!(
            "Passed:         {} (edge < {:.1})\n",
            s.passes, config.edge.min_edge
        ));
    }
    output.push_str(&format!(
        "Filtered:       {} ({})\n",
        s.filtered,
        pct(s.filter_rate)
    ));
    output.push_str(&format!("Win Rate:       {}\n", pct(s.win_rate)));
    output.push_str(&format!("Mean |Edge|:    {:.2}\n", s.mean_abs_edge));
    output.push('\n');

    section(&mut output, "BY SIDE");
    output.push_str(&format!("Over:           {}/{}\n", s.over_wins, s.over_bets));
    output.push_str(&format!("Under:          {}/{}\n", s.under_wins, s.under_bets));
    output.push('\n');

    section(&mut output, "BY EDGE SIZE");
    for (label, bucket) in [
        ("|edge| <= 5", &s.edge_buckets.low),
        ("5 < |edge| <= 15", &s.edge_buckets.medium),
        ("|edge| > 15", &s.edge_buckets.high),
    ] {
        output.push_str(&format!(
            "{:<18}{:>4} bets  {}\n",
            label,
            bucket.bets,
            pct(bucket.win_rate)
        ));
    }
    output.push('\n');

    section(&mut output, "SIGNIFICANCE");
    output.push_str(&format!(
        "Wilson 95% CI:  [{}, {}]\n",
        pct(s.wilson_ci_lower),
        pct(s.wilson_ci_upper)
    ));
    let sig_label = if s.is_significant {
        "SIGNIFICANT"
    } else {
        "NOT SIGNIFICANT"
    };
    output.push_str(&format!("Binomial p:     {:.4} ({})\n", s.p_value, sig_label));
    output.push('\n');

    section(&mut output, "UNITS AT -110");
    output.push_str(&format!("Net Units:      {:+.2}\n", s.units_f64()));
    output.push_str(&format!(
        "ROI per Bet:    {:+.1}%\n",
        s.roi.to_f64().unwrap_or(0.0) * 100.0
    ));
    output.push_str(&format!("Break-even WR:  {}\n", pct(BREAK_EVEN_WIN_RATE)));
    output.push('\n');

    section(&mut output, "PROCESSING STATS");
    output.push_str(&format!("Steps:              {}\n", run.steps));
    output.push_str(&format!(
        "Insufficient hist.: {}\n",
        run.skipped_insufficient_history
    ));
    output.push_str(&format!("Unusable:           {}\n", run.skipped_unusable));
    output.push_str(&format!("Errored:            {}\n", run.skipped_errors));
    output.push('\n');

    output.push_str(super::RULE);
    let verdict = if s.bets == 0 {
        "NO BETS"
    } else if s.is_profitable() {
        "PROFITABLE AT -110"
    } else {
        "BELOW BREAK-EVEN"
    };
    output.push_str(&format!("VERDICT: {}\n", verdict));
    output.push_str(super::RULE);

    output
}
