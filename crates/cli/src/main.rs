use clap::{Parser, Subcommand};

mod commands;

use commands::{BacktestArgs, PredictArgs, SampleArgs, ScheduleArgs, SweepArgs};

#[derive(Parser)]
#[command(name = "totals")]
#[command(about = "Game totals model with walk-forward backtesting", long_about = None)]
struct Cli {
    /// Optional log file path (logs to file instead of stderr)
    #[arg(long, global = true)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a walk-forward backtest over a game log
    Backtest(BacktestArgs),
    /// Predict a single matchup against a market total
    Predict(PredictArgs),
    /// Backtest a grid of total multipliers
    Sweep(SweepArgs),
    /// Repeated backtests over random subsets of games
    Sample(SampleArgs),
    /// Predict upcoming games on a fixed interval (daemon mode)
    Schedule(ScheduleArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_file.as_deref())?;

    match cli.command {
        Commands::Backtest(args) => commands::run_backtest(args).await?,
        Commands::Predict(args) => commands::run_predict(args).await?,
        Commands::Sweep(args) => commands::run_sweep(args).await?,
        Commands::Sample(args) => commands::run_sample(args).await?,
        Commands::Schedule(args) => commands::run_schedule(args).await?,
    }

    Ok(())
}

fn init_tracing(log_file: Option<&str>) -> anyhow::Result<()> {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}
