//! Stock Market CLI: interactive trading, listings, history, day advance and benchmarks.
//!
//! Commands:
//! - `trade`: interactive menu session (default when no command is given)
//! - `list`: print the latest quote for every stock
//! - `history`: print a ticker's history and its best buy/sell window
//! - `advance`: simulate one or more trading days
//! - `bench`: time search, best window and sort; write a CSV of results
//!
//! Logs go to stderr, filtered by `STOCKMARKET_LOG` (default `warn`).

mod display;
mod menu;

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use stockmarket_core::{find_best_window, sort_by_price, PriceOrder};
use stockmarket_runner::{
    run_benchmarks, write_results, InitOutcome, MarketConfig, MarketStore, TradeJournal,
    TradingDesk,
};

#[derive(Parser)]
#[command(
    name = "stockmarket",
    about = "Stock market simulator: trade, inspect history, advance the market"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides the config file).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Seed for reproducible price simulation (overrides the config file).
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive trading session.
    Trade,
    /// Print the latest quote for every stock.
    List {
        /// Sort by high price.
        #[arg(long, default_value_t = false)]
        sorted: bool,

        /// Sort high to low (implies --sorted).
        #[arg(long, default_value_t = false)]
        descending: bool,
    },
    /// Print a ticker's price history and best buy/sell window.
    History {
        /// Ticker symbol (case-insensitive).
        ticker: String,
    },
    /// Simulate the next trading day(s) for every stock.
    Advance {
        /// Number of days to simulate.
        #[arg(long, default_value_t = 1)]
        days: u32,
    },
    /// Benchmark search, best window and sort at the configured sizes.
    Bench {
        /// CSV output path. Defaults to the config's benchmark output.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    if let Err(err) = init_tracing() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() -> Result<()> {
    let filter = std::env::var("STOCKMARKET_LOG").unwrap_or_else(|_| "warn".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| anyhow::anyhow!("invalid log filter: {err}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Commands::Trade) {
        Commands::Trade => run_trade(&config),
        Commands::List { sorted, descending } => run_list(&config, sorted || descending, descending),
        Commands::History { ticker } => run_history(&config, &ticker),
        Commands::Advance { days } => run_advance(&config, days),
        Commands::Bench { output } => run_bench(&config, output),
    }
}

fn load_config(cli: &Cli) -> Result<MarketConfig> {
    let mut config = match &cli.config {
        Some(path) => MarketConfig::from_file(path)?,
        None => MarketConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(seed) = cli.seed {
        config.simulator_seed = Some(seed);
    }
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

/// Store with its stock file guaranteed to exist.
fn open_store(config: &MarketConfig) -> Result<MarketStore> {
    let store = MarketStore::from_config(config);
    let outcome = store
        .initialize()
        .with_context(|| format!("failed to initialize market data in {}", config.data_dir.display()))?;
    if let InitOutcome::Created { rows } = outcome {
        println!(
            "Created {} with {rows} rows from {}",
            store.stock_path().display(),
            config.seed_path().display()
        );
    }
    Ok(store)
}

fn run_trade(config: &MarketConfig) -> Result<()> {
    let store = open_store(config)?;
    let desk = TradingDesk::new(config.initial_cash)
        .with_journal(TradeJournal::new(config.journal_path()));

    let stdin = io::stdin();
    let mut session = menu::Session::new(
        store,
        desk,
        config.simulator(),
        stdin.lock(),
        io::stdout().lock(),
    )?;
    session.run()?;

    let trades = session.desk().transactions().len();
    tracing::info!(trades, "session ended");
    Ok(())
}

fn run_list(config: &MarketConfig, sorted: bool, descending: bool) -> Result<()> {
    let store = open_store(config)?;
    let mut stocks = store.load_current_stocks()?.values();

    let title = if sorted {
        let order = PriceOrder::from_ascending(!descending);
        sort_by_price(&mut stocks, order);
        match order {
            PriceOrder::Ascending => "STOCKS SORTED BY PRICE (LOW TO HIGH)",
            PriceOrder::Descending => "STOCKS SORTED BY PRICE (HIGH TO LOW)",
        }
    } else {
        stocks.as_mut_slice().sort_by(|a, b| a.ticker.cmp(&b.ticker));
        "ALL STOCKS"
    };

    display::stocks(&mut io::stdout().lock(), title, &stocks)?;
    Ok(())
}

fn run_history(config: &MarketConfig, ticker: &str) -> Result<()> {
    let store = open_store(config)?;
    let ticker = ticker.trim().to_uppercase();
    let history = store.load_history(&ticker)?;
    if history.is_empty() {
        bail!("no history found for {ticker}");
    }

    let window = find_best_window(&history);
    display::history(&mut io::stdout().lock(), &ticker, &history, window.as_ref())?;
    Ok(())
}

fn run_advance(config: &MarketConfig, days: u32) -> Result<()> {
    if days == 0 {
        bail!("--days must be at least 1");
    }
    let store = open_store(config)?;
    let mut simulator = config.simulator();

    for _ in 0..days {
        let summary = store.advance_day(&mut simulator)?;
        println!(
            "Advanced to {} ({} stocks updated)",
            summary.date.format(stockmarket_core::DATE_FORMAT),
            summary.rows
        );
    }
    Ok(())
}

fn run_bench(config: &MarketConfig, output: Option<PathBuf>) -> Result<()> {
    let output = output.unwrap_or_else(|| config.benchmark.output.clone());
    let seed = config.simulator_seed.unwrap_or_else(rand::random);

    let records = run_benchmarks(&config.benchmark.sizes, seed);
    write_results(&output, &records)?;

    display::benchmarks(&mut io::stdout().lock(), &records)?;
    println!("\nResults saved to {}", output.display());
    Ok(())
}
