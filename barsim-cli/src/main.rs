//! BarSim CLI — run backtests and generate synthetic data.
//!
//! Commands:
//! - `run` — backtest an SMA crossover strategy over a CSV file or a
//!   synthetic price path, print a summary, optionally save artifacts
//! - `generate` — write a synthetic OHLCV CSV for later runs

use anyhow::{Context, Result};
use barsim_core::engine::{run_backtest, EngineConfig, RunResult};
use barsim_core::risk::{StopConfig, StopRiskOverlay, WeightOverlay};
use barsim_core::strategy::SmaCrossStrategy;
use barsim_runner::metrics::PerformanceSummary;
use barsim_runner::{generate_gbm, load_csv, write_equity_csv, write_summary_json, GbmParams};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "barsim", about = "BarSim — bar-driven paper trading simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest an SMA crossover strategy over CSV or synthetic bars.
    Run {
        /// Path to an OHLCV CSV file. Omit to use synthetic data.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Instrument symbol.
        #[arg(long, default_value = "SYN")]
        symbol: String,

        /// Starting cash.
        #[arg(long, default_value_t = 100_000.0)]
        cash: f64,

        /// Short SMA window.
        #[arg(long, default_value_t = 20)]
        short: usize,

        /// Long SMA window.
        #[arg(long, default_value_t = 50)]
        long: usize,

        /// Stop-loss as a fraction of entry price (e.g. 0.05 for 5%).
        #[arg(long)]
        stop_loss: Option<f64>,

        /// Take-profit as a fraction of entry price.
        #[arg(long)]
        take_profit: Option<f64>,

        /// Slippage in basis points, adverse to the order side.
        #[arg(long, default_value_t = 1.0)]
        slippage_bps: f64,

        /// Commission as a fraction of traded notional.
        #[arg(long, default_value_t = 0.0005)]
        commission_rate: f64,

        /// Number of synthetic bars (ignored with --csv).
        #[arg(long, default_value_t = 1000)]
        periods: usize,

        /// Master seed for synthetic data (ignored with --csv).
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output directory for equity.csv and summary.json.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write a synthetic OHLCV CSV generated via geometric Brownian motion.
    Generate {
        /// Instrument symbol (also seeds the price path).
        #[arg(long, default_value = "SYN")]
        symbol: String,

        /// Number of daily bars.
        #[arg(long, default_value_t = 1000)]
        periods: usize,

        /// Master seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Starting price.
        #[arg(long, default_value_t = 100.0)]
        start_price: f64,

        /// Annualized drift.
        #[arg(long, default_value_t = 0.07)]
        drift: f64,

        /// Annualized volatility.
        #[arg(long, default_value_t = 0.20)]
        volatility: f64,

        /// Output CSV path.
        #[arg(long, default_value = "bars.csv")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            csv,
            symbol,
            cash,
            short,
            long,
            stop_loss,
            take_profit,
            slippage_bps,
            commission_rate,
            periods,
            seed,
            output,
        } => run_cmd(RunArgs {
            csv,
            symbol,
            cash,
            short,
            long,
            stop_loss,
            take_profit,
            slippage_bps,
            commission_rate,
            periods,
            seed,
            output,
        }),
        Commands::Generate {
            symbol,
            periods,
            seed,
            start_price,
            drift,
            volatility,
            out,
        } => generate_cmd(&symbol, periods, seed, start_price, drift, volatility, &out),
    }
}

struct RunArgs {
    csv: Option<PathBuf>,
    symbol: String,
    cash: f64,
    short: usize,
    long: usize,
    stop_loss: Option<f64>,
    take_profit: Option<f64>,
    slippage_bps: f64,
    commission_rate: f64,
    periods: usize,
    seed: u64,
    output: Option<PathBuf>,
}

fn run_cmd(args: RunArgs) -> Result<()> {
    let (bars, source) = match &args.csv {
        Some(path) => {
            let bars = load_csv(path)
                .with_context(|| format!("loading bars from {}", path.display()))?;
            (bars, path.display().to_string())
        }
        None => {
            let params = GbmParams {
                periods: args.periods,
                seed: args.seed,
                ..GbmParams::default()
            };
            let bars = generate_gbm(&args.symbol, &params);
            (bars, format!("synthetic (seed {})", args.seed))
        }
    };

    let strategy = SmaCrossStrategy::new(args.short, args.long);

    let stops = StopConfig::new(args.stop_loss, args.take_profit);
    let mut config = EngineConfig::new(&args.symbol);
    config.initial_cash = args.cash;
    config.slippage_bps = args.slippage_bps;
    config.commission_rate = args.commission_rate;
    let config = config.with_stops(stops);

    let overlay = StopRiskOverlay::new(stops);
    let overlay_ref: Option<&dyn WeightOverlay> =
        if config.stops.is_some() { Some(&overlay) } else { None };

    let result = run_backtest(&bars, &strategy, &config, overlay_ref)?;
    let summary = PerformanceSummary::compute(&result.equity_curve);

    print_summary(&args.symbol, &source, bars.len(), &result, &summary);

    if let Some(dir) = &args.output {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
        let timestamps: Vec<_> = bars.iter().map(|b| b.timestamp).collect();
        write_equity_csv(dir.join("equity.csv"), &timestamps, &result.equity_curve)?;
        write_summary_json(dir.join("summary.json"), &summary)?;
        println!("Artifacts saved to: {}", dir.display());
    }

    Ok(())
}

fn generate_cmd(
    symbol: &str,
    periods: usize,
    seed: u64,
    start_price: f64,
    drift: f64,
    volatility: f64,
    out: &PathBuf,
) -> Result<()> {
    let params = GbmParams {
        start_price,
        periods,
        drift,
        volatility,
        seed,
    };
    let bars = generate_gbm(symbol, &params);

    let mut writer = csv::Writer::from_path(out)
        .with_context(|| format!("creating {}", out.display()))?;
    writer.write_record(["timestamp", "open", "high", "low", "close", "volume"])?;
    for bar in &bars {
        writer.write_record([
            bar.timestamp.to_rfc3339(),
            format!("{:.6}", bar.open),
            format!("{:.6}", bar.high),
            format!("{:.6}", bar.low),
            format!("{:.6}", bar.close),
            format!("{:.2}", bar.volume),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {} bars to {}", bars.len(), out.display());
    Ok(())
}

fn print_summary(
    symbol: &str,
    source: &str,
    bar_count: usize,
    result: &RunResult,
    summary: &PerformanceSummary,
) {
    println!();
    println!("=== Backtest Result ===");
    println!("Symbol:         {symbol}");
    println!("Data:           {source}");
    println!("Bars:           {bar_count}");
    println!("Fills:          {}", result.fill_count());
    println!();
    println!("--- Performance ---");
    println!("Final Equity:   {:.2}", summary.final_equity);
    println!("Total Return:   {:.2}%", summary.total_return * 100.0);
    println!("Annual Return:  {:.2}%", summary.annual_return * 100.0);
    println!("Sharpe:         {:.3}", summary.sharpe);
    println!("Max Drawdown:   {:.2}%", summary.max_drawdown * 100.0);
    println!();
}
