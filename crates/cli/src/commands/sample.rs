//! Sampled walk-forward command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use totals_backtest::{run_sampled, BacktestConfig, SampleConfig, SampledReport};

use super::{header, pct, print_json, section, write_json, DataArgs, ModelArgs, OutputFormat};

/// Arguments for the sample command.
#[derive(Args, Debug, Clone)]
pub struct SampleArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub model: ModelArgs,

    /// Total multiplier (defaults to model.total_multiplier)
    #[arg(long)]
    pub multiplier: Option<f64>,

    /// Number of sampled runs
    #[arg(long, default_value = "40")]
    pub runs: usize,

    /// Games evaluated per run
    #[arg(long, default_value = "30")]
    pub sample_size: usize,

    /// Base seed; run `k` uses `seed + k`
    #[arg(long, default_value = "42")]
    pub sample_seed: u64,

    /// Lowest game index eligible for sampling
    #[arg(long, default_value = "100")]
    pub min_index: usize,

    /// Output JSON report to file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format: text, json (default: text)
    #[arg(long, default_value = "text")]
    pub format: String,
}

impl SampleArgs {
    fn sample_config(&self) -> SampleConfig {
        SampleConfig::default()
            .with_runs(self.runs)
            .with_sample_size(self.sample_size)
            .with_seed(self.sample_seed)
            .with_min_index(self.min_index)
    }
}

/// Runs the sample command.
///
/// # Errors
/// Returns an error if configuration or data cannot be loaded, the log is
/// malformed, or the report cannot be written.
pub async fn run_sample(args: SampleArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;

    let mut app = args.data.load_config()?;
    args.model.apply(&mut app);
    if let Some(multiplier) = args.multiplier {
        app.model.total_multiplier = multiplier;
    }

    let games = args.data.load_games()?;
    if games.len() <= args.min_index {
        tracing::warn!(
            "Only {} games; nothing at or after index {} to sample",
            games.len(),
            args.min_index
        );
    }
    let context = super::resolve_context(&app);
    let config = BacktestConfig::from(&app);
    let sample = args.sample_config();

    tracing::info!(
        "Running {} sampled backtests of {} games each",
        sample.runs,
        sample.sample_size
    );
    let report =
        tokio::task::spawn_blocking(move || run_sampled(&games, &config, &sample, &context))
            .await??;

    match format {
        OutputFormat::Text => println!("{}", format_sample_report(&report)),
        OutputFormat::Json => print_json(&report)?,
    }
    if let Some(path) = &args.output {
        write_json(path, &report)?;
    }
    Ok(())
}

/// Formats sampled runs as a text report.
pub fn format_sample_report(report: &SampledReport) -> String {
    let mut output = String::new();
    header(&mut output, "SAMPLED BACKTEST RESULTS");

    output.push_str(&format!("Runs:           {}\n", report.runs.len()));
    output.push_str(&format!("Runs with Bets: {}\n", report.runs_with_bets));
    output.push('\n');

    section(&mut output, "WIN RATE");
    output.push_str(&format!(
        "Mean:           {} (sd {})\n",
        pct(report.mean_win_rate),
        pct(report.std_win_rate)
    ));
    output.push_str(&format!(
        "95% CI:         [{}, {}]\n",
        pct(report.win_rate_ci.0),
        pct(report.win_rate_ci.1)
    ));
    output.push_str(&format!(
        "Pooled:         {} ({}/{})\n",
        pct(report.pooled_win_rate()),
        report.total_wins,
        report.total_bets
    ));
    output.push('\n');

    section(&mut output, "EDGE");
    output.push_str(&format!(
        "Mean |Edge|:    {:.2} (sd {:.2})\n",
        report.mean_edge, report.std_edge
    ));
    output.push_str(&format!(
        "95% CI:         [{:.2}, {:.2}]\n",
        report.edge_ci.0, report.edge_ci.1
    ));
    output.push('\n');

    output.push_str(super::RULE);
    output
}
